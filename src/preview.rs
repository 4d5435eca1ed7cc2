//! Live chat preview with a simulated storefront.
//!
//! All delays go through the session's own `Timers`; `tick` applies whatever
//! is due and `shutdown` (or drop) cancels the rest.

use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::cart::{Cart, Totals};
use crate::catalog::{Catalog, Product, ProductId};
use crate::config::{Pricing, Settings, Timing};
use crate::responder::respond;
use crate::template::{Template, TemplateSelection};
use crate::timer::{TimerId, Timers};
use crate::wizard::FormData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
    pub product: Option<ProductId>,
}

impl Message {
    fn new(role: Role, content: String, product: Option<ProductId>) -> Self {
        Self {
            role,
            content,
            timestamp: Local::now(),
            product,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    BotReply { query: String },
    CartInsert { product: ProductId },
    CheckoutDone,
}

/// What the chat widget looks like, taken from the wizard form.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub welcome_message: String,
    pub templates: TemplateSelection,
}

impl PreviewConfig {
    /// Blank names and empty template lists fall back to the widget defaults.
    pub fn from_form(form: &FormData) -> Self {
        let name = if form.name.trim().is_empty() {
            "AI Assistant".to_string()
        } else {
            form.name.clone()
        };
        let templates = if form.templates.is_empty() {
            [Template::GeneralAssistant].into_iter().collect()
        } else {
            form.templates.clone()
        };
        Self {
            name,
            primary_color: form.primary_color.clone(),
            secondary_color: form.secondary_color.clone(),
            welcome_message: form.welcome_message.clone(),
            templates,
        }
    }

    pub fn has_storefront(&self) -> bool {
        self.templates.contains(Template::SalesAssistant)
    }
}

pub struct PreviewSession {
    config: PreviewConfig,
    catalog: Catalog,
    timing: Timing,
    pricing: Pricing,
    clear_cart_after_checkout: bool,
    messages: Vec<Message>,
    pub input: String,
    pending_replies: usize,
    cart: Cart,
    cart_open: bool,
    checkout: Option<TimerId>,
    animating: Option<ProductId>,
    details: Option<ProductId>,
    timers: Timers<PreviewEvent>,
}

impl PreviewSession {
    pub fn new(config: PreviewConfig, settings: &Settings) -> Self {
        let welcome = Message::new(Role::Bot, config.welcome_message.clone(), None);
        Self {
            config,
            catalog: Catalog::sample(),
            timing: settings.timing.clone(),
            pricing: settings.pricing.clone(),
            clear_cart_after_checkout: settings.clear_cart_after_checkout,
            messages: vec![welcome],
            input: String::new(),
            pending_replies: 0,
            cart: Cart::new(),
            cart_open: false,
            checkout: None,
            animating: None,
            details: None,
            timers: Timers::new(),
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.pending_replies > 0
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn totals(&self) -> Totals {
        self.cart.totals(&self.pricing)
    }

    pub fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    pub fn is_checking_out(&self) -> bool {
        self.checkout.is_some_and(|id| self.timers.is_pending(id))
    }

    pub fn animating(&self) -> Option<&Product> {
        self.animating.and_then(|id| self.catalog.get(id))
    }

    pub fn details(&self) -> Option<&Product> {
        self.details.and_then(|id| self.catalog.get(id))
    }

    /// The product attached to the most recent bot message, if any.
    pub fn last_offered(&self) -> Option<&Product> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Bot)
            .and_then(|m| m.product)
            .and_then(|id| self.catalog.get(id))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Send the current input. Blank input is ignored.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.input.trim().is_empty() {
            return false;
        }
        let query = std::mem::take(&mut self.input);
        self.messages.push(Message::new(Role::User, query.clone(), None));
        self.pending_replies += 1;
        self.timers
            .schedule(now, self.timing.reply_delay(), PreviewEvent::BotReply { query });
        true
    }

    /// Starts the add-to-cart animation; the cart changes when it completes.
    pub fn add_to_cart(&mut self, id: ProductId, now: Instant) -> bool {
        let Some(product) = self.catalog.get(id) else {
            return false;
        };
        if !product.in_stock {
            debug!(product = product.name, "out of stock, not added");
            return false;
        }
        self.animating = Some(id);
        self.timers.schedule(
            now,
            self.timing.add_to_cart_delay(),
            PreviewEvent::CartInsert { product: id },
        );
        true
    }

    pub fn update_quantity(&mut self, id: &str, quantity: u32) {
        self.cart.update_quantity(id, quantity);
    }

    pub fn remove_item(&mut self, id: &str) {
        self.cart.remove(id);
    }

    /// Only available when the sales assistant template is active.
    pub fn open_cart(&mut self) -> bool {
        if !self.config.has_storefront() {
            return false;
        }
        self.cart_open = true;
        true
    }

    pub fn close_cart(&mut self) {
        self.cart_open = false;
    }

    pub fn checkout(&mut self, now: Instant) -> bool {
        if self.cart.is_empty() || self.checkout.is_some() {
            return false;
        }
        let totals = self.totals();
        info!(items = self.cart.total_items(), total = %totals.total.round_dp(2), "checkout started");
        let id = self
            .timers
            .schedule(now, self.timing.checkout_delay(), PreviewEvent::CheckoutDone);
        self.checkout = Some(id);
        true
    }

    pub fn show_details(&mut self, id: ProductId) {
        if self.catalog.get(id).is_some() {
            self.details = Some(id);
        }
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    /// Apply every timer that is due. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> usize {
        let events = self.timers.fire_due(now);
        let fired = events.len();
        for event in events {
            self.apply(event);
        }
        if fired > 0 {
            debug!(fired, remaining = self.timers.pending(), "preview timers fired");
        }
        fired
    }

    fn apply(&mut self, event: PreviewEvent) {
        match event {
            PreviewEvent::BotReply { query } => {
                let reply = respond(&query, &self.config.templates);
                self.messages
                    .push(Message::new(Role::Bot, reply.message, reply.product));
                self.pending_replies = self.pending_replies.saturating_sub(1);
            }
            PreviewEvent::CartInsert { product } => {
                if let Some(p) = self.catalog.get(product) {
                    self.cart.add(p);
                    info!(product = p.name, items = self.cart.total_items(), "added to cart");
                }
                if self.animating == Some(product) {
                    self.animating = None;
                }
            }
            PreviewEvent::CheckoutDone => {
                self.checkout = None;
                self.cart_open = false;
                if self.clear_cart_after_checkout {
                    self.cart.clear();
                }
                info!("checkout complete");
            }
        }
    }

    /// Cancel everything still scheduled.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.checkout.take() {
            self.timers.cancel(id);
        }
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "cancelled pending preview timers");
        }
        self.pending_replies = 0;
        self.animating = None;
    }
}

impl Drop for PreviewSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
