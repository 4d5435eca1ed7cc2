//! Canned-reply classifier behind the preview chat.
//!
//! Rules are checked in order against the lowercased message and the active
//! templates; the first match wins. Nothing is remembered between turns.

use tracing::debug;

use crate::catalog::{ProductId, FITNESS_WATCH, HEADPHONES, LAPTOP_STAND};
use crate::template::{Template, TemplateSelection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: String,
    pub product: Option<ProductId>,
}

struct Rule {
    template: Template,
    keywords: &'static [&'static str],
    message: &'static str,
    product: Option<ProductId>,
}

const RULES: &[Rule] = &[
    Rule {
        template: Template::SalesAssistant,
        keywords: &["headphone", "audio"],
        message: "I found these excellent wireless headphones for you! They're perfect for music and calls with amazing noise cancellation.",
        product: Some(HEADPHONES),
    },
    Rule {
        template: Template::SalesAssistant,
        keywords: &["watch", "fitness"],
        message: "Here's our top-rated fitness watch! It's great for tracking your health and workouts with advanced sensors.",
        product: Some(FITNESS_WATCH),
    },
    Rule {
        template: Template::SalesAssistant,
        keywords: &["laptop", "stand"],
        message: "This laptop stand is perfect for improving your workspace ergonomics. Unfortunately, it's currently out of stock, but I can notify you when it's available!",
        product: Some(LAPTOP_STAND),
    },
    Rule {
        template: Template::CustomerSupport,
        keywords: &["help", "support"],
        message: "I'm here to help! You can ask me about our products, shipping, returns, or any other questions you might have. I can also connect you with a human agent if needed.",
        product: None,
    },
    Rule {
        template: Template::CustomerSupport,
        keywords: &["order", "shipping"],
        message: "For order inquiries, I can help you track your shipment, update delivery preferences, or process returns. What's your order number?",
        product: None,
    },
    Rule {
        template: Template::LeadGeneration,
        keywords: &["demo", "trial"],
        message: "I'd be happy to set up a demo for you! Can you tell me a bit about your business and what you're looking for? I can also collect your contact information for our sales team.",
        product: None,
    },
    Rule {
        template: Template::LeadGeneration,
        keywords: &["price", "cost"],
        message: "Our pricing is flexible based on your needs. Would you like me to connect you with our sales team for a custom quote? I can also schedule a consultation call.",
        product: None,
    },
];

pub const FALLBACK_REPLY: &str =
    "I'm here to help! Feel free to ask me anything about our products or services.";

pub fn respond(query: &str, templates: &TemplateSelection) -> Reply {
    let lower = query.to_lowercase();

    for (i, rule) in RULES.iter().enumerate() {
        if templates.contains(rule.template) && rule.keywords.iter().any(|k| lower.contains(k)) {
            debug!(rule = i, template = %rule.template, "matched reply rule");
            return Reply {
                message: rule.message.to_string(),
                product: rule.product,
            };
        }
    }

    if templates.len() > 1 {
        let names: Vec<String> = templates.iter().map(|t| t.id().replacen('-', " ", 1)).collect();
        return Reply {
            message: format!(
                "I'm a versatile AI assistant with capabilities in {}. I can help with product recommendations, customer support, lead generation, and more! What would you like assistance with?",
                names.join(", ")
            ),
            product: None,
        };
    }

    Reply {
        message: FALLBACK_REPLY.to_string(),
        product: None,
    }
}
