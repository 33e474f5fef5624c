//! Fixed page content: the contact directory, job openings and shipping
//! options. Pages that only carry prose keep it in their templates.

/// One row of the contact directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub last_name: &'static str,
    pub first_name: &'static str,
    pub email: &'static str,
}

const fn contact(last_name: &'static str, first_name: &'static str, email: &'static str) -> Contact {
    Contact {
        last_name,
        first_name,
        email,
    }
}

/// Team members shown on the contact list page, in display order.
pub const CONTACTS: &[Contact] = &[
    contact("Smith", "James", "james.smith@example.com"),
    contact("Johnson", "Emma", "emma.johnson@example.com"),
    contact("Williams", "Michael", "michael.williams@example.com"),
    contact("Brown", "Olivia", "olivia.brown@example.com"),
    contact("Jones", "William", "william.jones@example.com"),
    contact("Garcia", "Sophia", "sophia.garcia@example.com"),
    contact("Miller", "Benjamin", "benjamin.miller@example.com"),
    contact("Davis", "Ava", "ava.davis@example.com"),
    contact("Rodriguez", "Liam", "liam.rodriguez@example.com"),
    contact("Martinez", "Isabella", "isabella.martinez@example.com"),
    contact("Wilson", "Noah", "noah.wilson@example.com"),
    contact("Anderson", "Mia", "mia.anderson@example.com"),
    contact("Taylor", "Ethan", "ethan.taylor@example.com"),
    contact("Thomas", "Charlotte", "charlotte.thomas@example.com"),
    contact("Lee", "Daniel", "daniel.lee@example.com"),
    contact("Hu", "Hadley", "2708296905@qq.com"),
    contact("Jia", "Friday", "714628152@qq.com"),
    contact("Yang", "Aaron", "3393847599@qq.com"),
    contact("Fang", "Lester", "1670875086@qq.com"),
    contact("Wang", "Nick", "2756501913@qq.com"),
];

/// An open position on the careers page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub title: &'static str,
    pub department: &'static str,
    pub location: &'static str,
    /// Work arrangement, e.g. `On-site`.
    pub arrangement: &'static str,
    pub description: &'static str,
    pub requirements: &'static [&'static str],
}

/// Current openings.
pub const JOBS: &[Job] = &[
    Job {
        title: "Product Development Engineer",
        department: "Engineering Department",
        location: "New York, NY",
        arrangement: "On-site",
        description: "We're looking for a creative Product Development Engineer to design and \
            develop innovative toilet products and bathroom solutions. You'll work closely with \
            our design and engineering teams to bring new products from concept to market.",
        requirements: &[
            "Bachelor's degree in Mechanical Engineering or related field",
            "3+ years of product development experience",
            "Proficiency in CAD software (SolidWorks preferred)",
            "Experience with prototyping and testing",
            "Strong problem-solving and communication skills",
        ],
    },
    Job {
        title: "Customer Support Specialist",
        department: "Customer Service Department",
        location: "Remote (USA)",
        arrangement: "Remote",
        description: "Join our customer service team and help customers with product \
            inquiries, technical issues, and installation questions. You'll be the frontline \
            representative of ToiletPro, ensuring our customers have exceptional experiences.",
        requirements: &[
            "2+ years of customer service experience",
            "Excellent verbal and written communication skills",
            "Technical aptitude and ability to troubleshoot issues",
            "Patience and empathy when dealing with customer concerns",
            "Ability to work flexible hours including weekends",
        ],
    },
    Job {
        title: "Digital Marketing Manager",
        department: "Marketing Department",
        location: "Chicago, IL",
        arrangement: "Hybrid",
        description: "We need a creative Digital Marketing Manager to develop and execute our \
            online marketing strategies. You'll oversee our social media presence, email \
            campaigns, SEO, and digital advertising to drive brand awareness and sales.",
        requirements: &[
            "Bachelor's degree in Marketing or related field",
            "5+ years of digital marketing experience",
            "Proven track record with SEO, SEM, and social media marketing",
            "Experience with marketing analytics tools",
            "Creative mindset with strong analytical skills",
        ],
    },
    Job {
        title: "Warehouse Operations Supervisor",
        department: "Operations Department",
        location: "Los Angeles, CA",
        arrangement: "On-site",
        description: "Oversee daily operations at our Los Angeles distribution center. You'll \
            manage a team, optimize warehouse processes, ensure inventory accuracy, and maintain \
            high standards for order fulfillment and shipping.",
        requirements: &[
            "3+ years of warehouse or logistics management experience",
            "Experience with warehouse management systems",
            "Strong leadership and team management skills",
            "Knowledge of safety regulations and best practices",
            "Ability to lift up to 50 pounds and work in a fast-paced environment",
        ],
    },
];

/// A delivery option on the shipping information page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingOption {
    pub name: &'static str,
    pub delivery_time: &'static str,
    pub cost: &'static str,
    pub summary: &'static str,
}

/// Delivery options, cheapest first.
pub const SHIPPING_OPTIONS: &[ShippingOption] = &[
    ShippingOption {
        name: "Standard Shipping",
        delivery_time: "5-7 business days",
        cost: "$15 (Free on orders over $100)",
        summary: "Our most economical option for non-urgent deliveries.",
    },
    ShippingOption {
        name: "Expedited Shipping",
        delivery_time: "2-3 business days",
        cost: "$25",
        summary: "Perfect when you need your items a bit faster.",
    },
    ShippingOption {
        name: "Next-Day Delivery",
        delivery_time: "1 business day",
        cost: "$45",
        summary: "For urgent situations when you need your items tomorrow.",
    },
];
