//! Static copy for the marketing pages.
//!
//! Everything here is compiled in; there is no content directory to load at
//! startup.

/// Company contact details shown on the contact page and in the footer.
pub struct ContactDetails {
    pub phone_display: &'static str,
    pub phone_href: &'static str,
    pub email: &'static str,
    pub location: &'static str,
}

pub const CONTACT: ContactDetails = ContactDetails {
    phone_display: "+91 97879 63935",
    phone_href: "tel:+919787963935",
    email: "relyceinfotech@gmail.com",
    location: "Chennai, Tamil Nadu, India",
};

/// A service offering on the services page and the landing page.
pub struct Service {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service {
        title: "Web Development",
        description: "Responsive, scalable, and SEO friendly websites tailored to your brand. \
                      From landing pages to complex platforms built with modern frameworks \
                      that convert visitors into loyal customers.",
    },
    Service {
        title: "App Development",
        description: "Native and cross platform mobile applications that engage users and \
                      drive growth. Fast, reliable, and beautiful on every screen, Android and \
                      iOS, one codebase.",
    },
    Service {
        title: "UI/UX Design",
        description: "We research your users deeply and craft visually stunning interfaces \
                      that delight and convert. Aesthetics meet functionality in every pixel \
                      we design.",
    },
    Service {
        title: "Software Development",
        description: "Custom enterprise grade software to automate processes and improve \
                      efficiency. Robust, scalable systems tailored to your specific \
                      operational needs.",
    },
    Service {
        title: "Digital Marketing",
        description: "Data driven strategies to boost your online presence. SEO, paid \
                      advertising, social media and content, maximizing your ROI across \
                      every channel.",
    },
    Service {
        title: "E-commerce Solutions",
        description: "Feature rich online stores with seamless shopping experiences, secure \
                      payments, inventory management, and end to end solutions built to sell.",
    },
    Service {
        title: "IT Consulting",
        description: "Strategic technology guidance to navigate digital transformation. \
                      Roadmaps, architecture planning, and the right investments for long \
                      term growth.",
    },
];

/// A step or milestone on the about page.
pub struct Milestone {
    pub label: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const JOURNEY: &[Milestone] = &[
    Milestone {
        label: "Sep 2024",
        title: "The Genesis",
        description: "Founded with a vision to bridge the gap between ideas and technology, \
                      starting with a small team of passionate developers.",
    },
    Milestone {
        label: "Dec 2024",
        title: "First Major Delivery",
        description: "Successfully delivered a large scale e commerce platform, proving our \
                      capability in complex, high stakes development.",
    },
    Milestone {
        label: "Jan 2025",
        title: "Team Expansion",
        description: "Grew our team and expanded services to include mobile app development, \
                      AI engineering, and cloud solutions.",
    },
    Milestone {
        label: "Sep 2025",
        title: "AI Innovation",
        description: "Launched our proprietary AI driven analytics tool, helping businesses \
                      make smarter, data backed decisions at scale.",
    },
];

pub const PROCESS: &[Milestone] = &[
    Milestone {
        label: "01",
        title: "Discover",
        description: "Deep dive into your vision, goals, and market landscape to define the \
                      perfect strategy.",
    },
    Milestone {
        label: "02",
        title: "Design",
        description: "Craft intuitive interfaces and robust architecture that align with your \
                      brand identity.",
    },
    Milestone {
        label: "03",
        title: "Develop",
        description: "Build scalable, production ready solutions with clean code and modern \
                      engineering practice.",
    },
    Milestone {
        label: "04",
        title: "Deploy",
        description: "Launch with confidence: seamless deployment, monitoring, and ongoing \
                      support.",
    },
];

pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
}

pub const TEAM: &[TeamMember] = &[
    TeamMember { name: "Ukenthiran A", role: "Founder & CEO" },
    TeamMember { name: "Tamizharuvi P", role: "CTO" },
    TeamMember { name: "Dharshan L", role: "COO" },
    TeamMember { name: "Gohulakannan K", role: "CMO" },
    TeamMember { name: "Karthiban R", role: "CPO" },
    TeamMember { name: "Naveenkumar S", role: "Lead AI Engineer" },
    TeamMember { name: "Vetri Vivian J", role: "Full Stack Developer" },
    TeamMember { name: "Vishal T", role: "Full Stack Developer" },
];

/// One FAQ entry. `points` renders as a bullet list after `answer`.
pub struct Question {
    pub question: &'static str,
    pub answer: &'static str,
    pub points: &'static [&'static str],
}

pub struct FaqCategory {
    pub name: &'static str,
    pub questions: &'static [Question],
}

const fn q(question: &'static str, answer: &'static str) -> Question {
    Question {
        question,
        answer,
        points: &[],
    }
}

pub const FAQ: &[FaqCategory] = &[
    FaqCategory {
        name: "About Relyce Infotech",
        questions: &[
            q(
                "What does Relyce Infotech do?",
                "We are a full-service IT consulting company providing comprehensive \
                 technology solutions. We specialize in website development, mobile app \
                 development (iOS & Android), e commerce solutions, and reliable technical \
                 and non technical support for businesses of all sizes.",
            ),
            q(
                "What types of businesses do you work with?",
                "We proudly serve a diverse range of businesses from startups and small \
                 businesses to mid sized enterprises. We have extensive experience working \
                 with clients in retail, healthcare, education, and finance.",
            ),
            q(
                "Why should I choose Relyce Infotech?",
                "We differentiate ourselves through our commitment to personalized service, \
                 deep technical expertise, and a focus on ROI. We're not just about fixing \
                 problems; we're about building lasting partnerships and helping you grow.",
            ),
            q(
                "Where are you located?",
                "We are located in Chennai, Tamil Nadu, India. However, we primarily work \
                 remotely, allowing us to serve clients globally.",
            ),
        ],
    },
    FaqCategory {
        name: "Website Development",
        questions: &[
            Question {
                question: "What types of websites do you build?",
                answer: "We build every kind of site a business needs:",
                points: &[
                    "Static Websites: simple, informational websites.",
                    "Dynamic Websites: content-rich sites with user interaction.",
                    "Responsive Websites: sites that adapt to all devices.",
                    "CMS-Based Websites: built on platforms like WordPress.",
                ],
            },
            q(
                "What's the typical website development timeline?",
                "A simple website might take 2-4 weeks, while a more complex site could take \
                 6-12 weeks or longer. We provide detailed timelines after the initial \
                 consultation.",
            ),
            q(
                "Do you handle website hosting and domain registration?",
                "Yes, we can manage your hosting and domain registration, or we can integrate \
                 with your existing providers.",
            ),
            q(
                "What is SEO, and do you offer SEO services?",
                "SEO (Search Engine Optimization) is improving your site's visibility on \
                 search engines. We offer SEO consulting and implementation to help you rank \
                 higher.",
            ),
        ],
    },
    FaqCategory {
        name: "App Development",
        questions: &[
            q(
                "What platforms do you develop apps for?",
                "We develop native applications for both iOS and Android, and can also \
                 discuss cross-platform options like React Native or Flutter.",
            ),
            q(
                "How much does it cost to develop a mobile app?",
                "App development costs vary widely based on complexity. We provide custom \
                 quotes after an initial consultation and project scoping.",
            ),
            q(
                "Do you provide app maintenance and support?",
                "Yes, we offer ongoing app maintenance and support services, including bug \
                 fixes, updates, and feature enhancements.",
            ),
        ],
    },
    FaqCategory {
        name: "E-commerce Solutions",
        questions: &[
            q(
                "What e-commerce platforms do you work with?",
                "We have extensive experience with Shopify, WooCommerce, Magento, and \
                 BigCommerce. We can also build custom solutions.",
            ),
            q(
                "Do you handle payment gateway integration?",
                "Yes, we integrate secure payment gateways like Stripe, PayPal, and \
                 Authorize.net into your e-commerce store.",
            ),
        ],
    },
    FaqCategory {
        name: "Technical & Non-Technical Support",
        questions: &[
            Question {
                question: "What types of technical support do you offer?",
                answer: "Our support desk covers:",
                points: &[
                    "Help Desk Support",
                    "Network Troubleshooting",
                    "Server Management",
                    "Cybersecurity Services",
                ],
            },
            q(
                "What does 'non-technical support' mean?",
                "This includes assistance with business process optimization, staff \
                 training, project management, and strategic technology planning.",
            ),
            q(
                "Do you offer managed services?",
                "Yes, we offer comprehensive managed services packages to handle your IT \
                 infrastructure and support needs proactively.",
            ),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faq_categories_are_populated() {
        assert_eq!(FAQ.len(), 5);
        assert!(FAQ.iter().all(|c| !c.questions.is_empty()));
    }

    #[test]
    fn test_services_listed() {
        assert_eq!(SERVICES.len(), 7);
        assert_eq!(SERVICES[0].title, "Web Development");
    }
}
