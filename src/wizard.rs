use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::config::FormDefaults;
use crate::template::TemplateSelection;

pub const MAX_DELAY_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Basic,
    Appearance,
    Behavior,
    Preview,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Basic, Step::Appearance, Step::Behavior, Step::Preview];

    pub fn id(self) -> &'static str {
        match self {
            Step::Basic => "basic",
            Step::Appearance => "appearance",
            Step::Behavior => "behavior",
            Step::Preview => "preview",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Basic => "Basic Info",
            Step::Appearance => "Appearance",
            Step::Behavior => "Behavior",
            Step::Preview => "Preview",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Step::Basic => "🤖",
            Step::Appearance => "🎨",
            Step::Behavior => "⚙",
            Step::Preview => "👁",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::Basic => "Configure your chatbot's identity",
            Step::Appearance => "Customize the visual design",
            Step::Behavior => "Set interaction preferences",
            Step::Preview => "Test and deploy your chatbot",
        }
    }

    pub fn index(self) -> usize {
        Step::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

/// Position in the step list plus the set of steps already completed.
#[derive(Debug, Clone)]
pub struct WizardState {
    current: Step,
    completed: BTreeSet<Step>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current: Step::Basic,
            completed: BTreeSet::new(),
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn index(&self) -> usize {
        self.current.index()
    }

    /// Fraction of the way through, counting the current step.
    pub fn progress(&self) -> f64 {
        (self.index() + 1) as f64 / Step::ALL.len() as f64
    }

    pub fn progress_percent(&self) -> u16 {
        ((self.index() + 1) * 100 / Step::ALL.len()) as u16
    }

    pub fn is_first(&self) -> bool {
        self.index() == 0
    }

    pub fn is_last(&self) -> bool {
        self.index() + 1 == Step::ALL.len()
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed.contains(&step)
    }

    /// Mark the current step done and move on. No-op on the last step.
    pub fn advance(&mut self) {
        let Some(&next) = Step::ALL.get(self.index() + 1) else {
            return;
        };
        self.completed.insert(self.current);
        self.move_to(next);
    }

    /// No-op on the first step.
    pub fn retreat(&mut self) {
        if let Some(prev) = self.index().checked_sub(1) {
            self.move_to(Step::ALL[prev]);
        }
    }

    /// Jump anywhere; earlier steps need not be completed.
    pub fn go_to(&mut self, step: Step) {
        self.move_to(step);
    }

    fn move_to(&mut self, step: Step) {
        if step != self.current {
            info!(from = self.current.id(), to = step.id(), "wizard step");
        }
        self.current = step;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub name: String,
    pub description: String,
    pub templates: TemplateSelection,
    pub primary_color: String,
    pub secondary_color: String,
    pub welcome_message: String,
    pub auto_show: bool,
    pub delay_time: u32,
    pub collect_email: bool,
    pub fallback_contact: bool,
}

impl Default for FormData {
    fn default() -> Self {
        Self::from_defaults(&FormDefaults::default())
    }
}

impl FormData {
    pub fn from_defaults(defaults: &FormDefaults) -> Self {
        Self {
            name: defaults.name.clone(),
            description: defaults.description.clone(),
            templates: defaults.templates.iter().copied().collect(),
            primary_color: defaults.primary_color.clone(),
            secondary_color: defaults.secondary_color.clone(),
            welcome_message: defaults.welcome_message.clone(),
            auto_show: defaults.auto_show,
            delay_time: defaults.delay_time.min(MAX_DELAY_SECS),
            collect_email: defaults.collect_email,
            fallback_contact: defaults.fallback_contact,
        }
    }

    /// Whether the Continue action is enabled on `step`.
    pub fn can_continue(&self, step: Step) -> bool {
        match step {
            Step::Basic => !self.name.trim().is_empty() && !self.templates.is_empty(),
            _ => true,
        }
    }

    pub fn text(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.name.clone(),
            FormField::Description => self.description.clone(),
            FormField::PrimaryColor => self.primary_color.clone(),
            FormField::SecondaryColor => self.secondary_color.clone(),
            FormField::WelcomeMessage => self.welcome_message.clone(),
            FormField::DelayTime => self.delay_time.to_string(),
            FormField::AutoShow => yes_no(self.auto_show).to_string(),
            FormField::CollectEmail => yes_no(self.collect_email).to_string(),
            FormField::FallbackContact => yes_no(self.fallback_contact).to_string(),
        }
    }

    /// Store edited text into a text field. Delay time keeps digits only and
    /// is clamped to the allowed range.
    pub fn set_text(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Description => self.description = value,
            FormField::PrimaryColor => self.primary_color = value,
            FormField::SecondaryColor => self.secondary_color = value,
            FormField::WelcomeMessage => self.welcome_message = value,
            FormField::DelayTime => self.delay_time = parse_delay(&value),
            FormField::AutoShow | FormField::CollectEmail | FormField::FallbackContact => {}
        }
    }

    pub fn toggle(&mut self, field: FormField) {
        match field {
            FormField::AutoShow => self.auto_show = !self.auto_show,
            FormField::CollectEmail => self.collect_email = !self.collect_email,
            FormField::FallbackContact => self.fallback_contact = !self.fallback_contact,
            _ => {}
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn parse_delay(value: &str) -> u32 {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<u64>()
        .map(|n| n.min(u64::from(MAX_DELAY_SECS)) as u32)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    PrimaryColor,
    SecondaryColor,
    WelcomeMessage,
    AutoShow,
    DelayTime,
    CollectEmail,
    FallbackContact,
}

impl FormField {
    /// Editable fields shown on a step, top to bottom.
    pub fn for_step(step: Step) -> &'static [FormField] {
        match step {
            Step::Basic => &[FormField::Name, FormField::Description],
            Step::Appearance => &[
                FormField::PrimaryColor,
                FormField::SecondaryColor,
                FormField::WelcomeMessage,
            ],
            Step::Behavior => &[
                FormField::AutoShow,
                FormField::DelayTime,
                FormField::CollectEmail,
                FormField::FallbackContact,
            ],
            Step::Preview => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Chatbot Name *",
            FormField::Description => "Description",
            FormField::PrimaryColor => "Primary Color",
            FormField::SecondaryColor => "Secondary Color",
            FormField::WelcomeMessage => "Welcome Message",
            FormField::AutoShow => "Auto-show Chatbot",
            FormField::DelayTime => "Delay Time (seconds)",
            FormField::CollectEmail => "Collect User Email",
            FormField::FallbackContact => "Fallback to Contact Form",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Customer Support Bot",
            FormField::Description => "A helpful assistant for customer support inquiries...",
            FormField::WelcomeMessage => "Hi there! How can I help you today?",
            FormField::PrimaryColor | FormField::SecondaryColor => "#rrggbb",
            _ => "",
        }
    }

    pub fn hint(self) -> Option<&'static str> {
        match self {
            FormField::AutoShow => Some("Automatically open the chatbot when users visit your page"),
            FormField::DelayTime => Some("Time to wait before showing the chatbot automatically"),
            FormField::CollectEmail => Some("Ask users for their email before starting a conversation"),
            FormField::FallbackContact => {
                Some("Show a contact form when the chatbot can't answer a question")
            }
            _ => None,
        }
    }

    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            FormField::AutoShow | FormField::CollectEmail | FormField::FallbackContact
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    #[test]
    fn test_advance_never_skips_or_overruns() {
        let mut wizard = WizardState::new();
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(wizard.current(), *step);
            assert_eq!(wizard.index(), i);
            wizard.advance();
        }
        assert_eq!(wizard.current(), Step::Preview);
        wizard.advance();
        assert_eq!(wizard.current(), Step::Preview);

        assert!(wizard.is_completed(Step::Basic));
        assert!(wizard.is_completed(Step::Behavior));
        assert!(!wizard.is_completed(Step::Preview));
    }

    #[test]
    fn test_retreat_stops_at_first() {
        let mut wizard = WizardState::new();
        wizard.retreat();
        assert_eq!(wizard.current(), Step::Basic);
        assert!(wizard.is_first());

        wizard.advance();
        wizard.advance();
        wizard.retreat();
        assert_eq!(wizard.current(), Step::Appearance);
        // completion survives going back
        assert!(wizard.is_completed(Step::Appearance));
    }

    #[test]
    fn test_go_to_is_unconditional() {
        let mut wizard = WizardState::new();
        wizard.go_to(Step::Preview);
        assert!(wizard.is_last());
        assert!(!wizard.is_completed(Step::Basic));
        assert_eq!(wizard.progress_percent(), 100);

        wizard.go_to(Step::Appearance);
        assert!((wizard.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_is_idempotent() {
        let mut wizard = WizardState::new();
        wizard.advance();
        wizard.go_to(Step::Basic);
        wizard.advance();
        assert_eq!(wizard.completed.len(), 1);
    }

    #[test]
    fn test_basic_step_gate() {
        let mut form = FormData::default();
        assert!(!form.can_continue(Step::Basic));

        form.name = "   ".into();
        form.templates.toggle(Template::SalesAssistant);
        assert!(!form.can_continue(Step::Basic));

        form.name = "Shop Bot".into();
        assert!(form.can_continue(Step::Basic));

        form.templates.clear();
        assert!(!form.can_continue(Step::Basic));
        assert!(form.can_continue(Step::Behavior));
    }

    #[test]
    fn test_delay_time_edit() {
        let mut form = FormData::default();
        assert_eq!(form.delay_time, 5);
        form.set_text(FormField::DelayTime, "12".into());
        assert_eq!(form.delay_time, 12);
        form.set_text(FormField::DelayTime, "600".into());
        assert_eq!(form.delay_time, MAX_DELAY_SECS);
        form.set_text(FormField::DelayTime, "".into());
        assert_eq!(form.delay_time, 0);
    }

    #[test]
    fn test_toggles_and_export_shape() {
        let mut form = FormData::default();
        form.toggle(FormField::AutoShow);
        form.toggle(FormField::CollectEmail);
        form.toggle(FormField::Name);
        assert!(form.auto_show);
        assert!(!form.collect_email);

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["primaryColor"], "#0070f3");
        assert_eq!(json["autoShow"], true);
        assert_eq!(json["templates"], serde_json::json!([]));
    }
}
