//! Capability templates a chatbot can be built from, and the ordered
//! selection the wizard keeps of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    CustomerSupport,
    SalesAssistant,
    LeadGeneration,
    GeneralAssistant,
}

impl Template {
    /// Catalog order.
    pub const ALL: [Template; 4] = [
        Template::CustomerSupport,
        Template::SalesAssistant,
        Template::LeadGeneration,
        Template::GeneralAssistant,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Template::CustomerSupport => "customer-support",
            Template::SalesAssistant => "sales-assistant",
            Template::LeadGeneration => "lead-generation",
            Template::GeneralAssistant => "general-assistant",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Template::CustomerSupport => "Customer Support",
            Template::SalesAssistant => "Sales Assistant",
            Template::LeadGeneration => "Lead Generation",
            Template::GeneralAssistant => "General Assistant",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Template::CustomerSupport => {
                "Handle customer inquiries, support tickets, and provide instant help"
            }
            Template::SalesAssistant => {
                "Help customers find products, make purchases, and increase conversions"
            }
            Template::LeadGeneration => {
                "Capture leads, qualify prospects, and grow your customer base"
            }
            Template::GeneralAssistant => {
                "Multi-purpose chatbot for various business needs and tasks"
            }
        }
    }

    pub fn features(self) -> [&'static str; 4] {
        match self {
            Template::CustomerSupport => {
                ["FAQ Handling", "Ticket Creation", "Live Chat Handoff", "24/7 Support"]
            }
            Template::SalesAssistant => [
                "Product Recommendations",
                "Order Tracking",
                "Upselling",
                "Cart Recovery",
            ],
            Template::LeadGeneration => {
                ["Lead Capture", "Qualification", "CRM Integration", "Follow-up"]
            }
            Template::GeneralAssistant => {
                ["Custom Responses", "Multi-language", "Analytics", "Flexible"]
            }
        }
    }

    pub fn capabilities(self) -> [&'static str; 4] {
        match self {
            Template::CustomerSupport => [
                "Answer common questions instantly",
                "Create support tickets automatically",
                "Escalate complex issues to human agents",
                "Track customer satisfaction",
            ],
            Template::SalesAssistant => [
                "Recommend products based on preferences",
                "Guide customers through purchase process",
                "Recover abandoned shopping carts",
                "Provide order status updates",
            ],
            Template::LeadGeneration => [
                "Collect visitor information intelligently",
                "Qualify leads with smart questions",
                "Integrate with your CRM system",
                "Schedule follow-up appointments",
            ],
            Template::GeneralAssistant => [
                "Handle diverse conversation topics",
                "Support multiple languages",
                "Provide detailed analytics",
                "Customize for any business need",
            ],
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown template '{0}' (expected one of: customer-support, sales-assistant, lead-generation, general-assistant)")]
pub struct ParseTemplateError(pub String);

impl FromStr for Template {
    type Err = ParseTemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| ParseTemplateError(s.to_string()))
    }
}

/// Selected templates in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateSelection(Vec<Template>);

impl TemplateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, template: Template) -> bool {
        self.0.contains(&template)
    }

    pub fn toggle(&mut self, template: Template) {
        if let Some(pos) = self.0.iter().position(|t| *t == template) {
            self.0.remove(pos);
        } else {
            self.0.push(template);
        }
    }

    pub fn select_all(&mut self) {
        self.0 = Template::ALL.to_vec();
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Template> + '_ {
        self.0.iter().copied()
    }

    /// 1-based pick order, shown as the `#n` badge.
    pub fn position(&self, template: Template) -> Option<usize> {
        self.0.iter().position(|t| *t == template).map(|i| i + 1)
    }

    pub fn summary(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let names: Vec<String> = self.0.iter().map(|t| t.name().to_lowercase()).collect();
        Some(format!(
            "Your AI agent will be able to handle {} tasks intelligently by understanding user intent and context.",
            names.join(", ")
        ))
    }
}

impl FromIterator<Template> for TemplateSelection {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        let mut selection = TemplateSelection::new();
        for template in iter {
            if !selection.contains(template) {
                selection.0.push(template);
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_keeps_pick_order() {
        let mut sel = TemplateSelection::new();
        sel.toggle(Template::LeadGeneration);
        sel.toggle(Template::CustomerSupport);
        assert_eq!(sel.position(Template::LeadGeneration), Some(1));
        assert_eq!(sel.position(Template::CustomerSupport), Some(2));

        sel.toggle(Template::LeadGeneration);
        assert!(!sel.contains(Template::LeadGeneration));
        assert_eq!(sel.position(Template::CustomerSupport), Some(1));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut sel: TemplateSelection = [Template::GeneralAssistant].into_iter().collect();
        sel.select_all();
        assert_eq!(sel.iter().collect::<Vec<_>>(), Template::ALL.to_vec());
        sel.clear();
        assert!(sel.is_empty());
        assert_eq!(sel.summary(), None);
    }

    #[test]
    fn test_summary_names_templates() {
        let sel: TemplateSelection = [Template::CustomerSupport, Template::SalesAssistant]
            .into_iter()
            .collect();
        assert_eq!(
            sel.summary().unwrap(),
            "Your AI agent will be able to handle customer support, sales assistant tasks intelligently by understanding user intent and context."
        );
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("sales-assistant".parse::<Template>(), Ok(Template::SalesAssistant));
        assert!("sales".parse::<Template>().is_err());

        let sel: TemplateSelection = [Template::LeadGeneration].into_iter().collect();
        assert_eq!(serde_json::to_string(&sel).unwrap(), r#"["lead-generation"]"#);
    }

    #[test]
    fn test_config_templates_are_deduplicated() {
        let defaults: Vec<Template> =
            serde_json::from_str(r#"["sales-assistant", "lead-generation", "sales-assistant"]"#).unwrap();
        let sel: TemplateSelection = defaults.into_iter().collect();
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.position(Template::LeadGeneration), Some(2));
    }
}
