//! Quantity-discount pricing table.
//!
//! DESIGN
//! ======
//! Each tier sells `quantity` units at `price_per_unit`. Savings are measured
//! against buying the same quantity at the base price, so a tier priced at or
//! above the base price shows no savings badge.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{defaults_of, edit, move_within, remove_from, scoped};
use crate::escape::safe_url;
use crate::list;
use crate::style::{self, FONT_STACK, MOBILE_BREAKPOINT};
use crate::view::{
    Element, RenderMode, Rule, Script, Stylesheet, WidgetView, decls, decode_settings, instance_id,
};
use crate::{WidgetError, WidgetKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTier {
    pub id: u32,
    pub quantity: u32,
    pub price_per_unit: f64,
    pub popular: bool,
}

impl Default for PricingTier {
    fn default() -> Self {
        Self { id: 1, quantity: 1, price_per_unit: 10.0, popular: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    pub title: String,
    pub subtitle: String,
    pub product_name: String,
    pub base_price: f64,
    pub currency: String,
    pub tiers: Vec<PricingTier>,
    pub popular_label: String,
    pub show_savings: bool,
    pub cta_text: String,
    pub cta_url: String,
    pub accent_color: String,
    pub background_color: String,
    pub card_color: String,
    pub text_color: String,
    pub border_radius: f64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            title: "Buy more, save more".into(),
            subtitle: "Choose the bundle that works for you".into(),
            product_name: "Item".into(),
            base_price: 10.0,
            currency: "$".into(),
            tiers: vec![
                PricingTier { id: 1, quantity: 1, price_per_unit: 10.0, popular: false },
                PricingTier { id: 2, quantity: 3, price_per_unit: 9.0, popular: true },
                PricingTier { id: 3, quantity: 5, price_per_unit: 8.0, popular: false },
            ],
            popular_label: "Most Popular".into(),
            show_savings: true,
            cta_text: "Add to cart".into(),
            cta_url: "#".into(),
            accent_color: "#4f46e5".into(),
            background_color: "#f9fafb".into(),
            card_color: "#ffffff".into(),
            text_color: "#111827".into(),
            border_radius: 12.0,
        }
    }
}

impl PricingSettings {
    /// Append a tier one unit larger than the current largest, at the base price.
    pub fn add_tier(&mut self) -> &mut PricingTier {
        let id = list::next_id(&self.tiers, |tier| tier.id);
        let quantity = self.tiers.iter().map(|tier| tier.quantity).max().unwrap_or(0) + 1;
        self.tiers.push(PricingTier { id, quantity, price_per_unit: self.base_price, popular: false });
        let last = self.tiers.len() - 1;
        &mut self.tiers[last]
    }

    #[must_use]
    pub fn quotes(&self) -> Vec<TierQuote> {
        self.tiers.iter().map(|tier| TierQuote::compute(tier, self.base_price)).collect()
    }
}

// =============================================================================
// TIER MATH
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierQuote {
    pub total: f64,
    pub savings: f64,
    pub savings_percent: f64,
}

impl TierQuote {
    #[must_use]
    pub fn compute(tier: &PricingTier, base_price: f64) -> Self {
        let quantity = f64::from(tier.quantity);
        let total = quantity * tier.price_per_unit;
        let list_price = quantity * base_price;
        let savings = list_price - total;
        let savings_percent = if list_price == 0.0 { 0.0 } else { savings / list_price * 100.0 };
        Self { total, savings, savings_percent }
    }

    /// Zero or negative savings suppress the badge.
    #[must_use]
    pub fn shows_savings(&self) -> bool {
        self.savings > 0.0
    }

    #[must_use]
    pub fn savings_label(&self, currency: &str) -> String {
        format!("Save {} ({:.0}%)", style::money(currency, self.savings), self.savings_percent)
    }
}

// =============================================================================
// VIEW
// =============================================================================

const SCRIPT: &str = r"
var tiers = root.querySelectorAll('.wh-pricing-tier');
var cta = root.querySelector('.wh-pricing-cta');
function select(tier) {
  Array.prototype.forEach.call(tiers, function (other) {
    other.classList.toggle('is-selected', other === tier);
    other.setAttribute('aria-checked', other === tier ? 'true' : 'false');
  });
  if (cta) {
    cta.setAttribute('data-quantity', tier.getAttribute('data-quantity'));
    var total = tier.querySelector('.wh-pricing-total');
    cta.textContent = cfg.ctaText + (total ? ' - ' + total.textContent : '');
  }
}
Array.prototype.forEach.call(tiers, function (tier) {
  tier.addEventListener('click', function () { select(tier); });
  tier.addEventListener('keydown', function (event) {
    if (event.key === 'Enter' || event.key === ' ') {
      event.preventDefault();
      select(tier);
    }
  });
});
";

fn initial_selection(settings: &PricingSettings) -> usize {
    settings.tiers.iter().position(|tier| tier.popular).unwrap_or(0)
}

#[must_use]
pub fn view(settings: &PricingSettings, id: &str, _mode: RenderMode) -> WidgetView {
    let selected = initial_selection(settings);
    let quotes = settings.quotes();

    let tiers = settings.tiers.iter().zip(&quotes).enumerate().map(|(index, (tier, quote))| {
        let mut class = String::from("wh-pricing-tier");
        if tier.popular {
            class.push_str(" is-popular");
        }
        if index == selected {
            class.push_str(" is-selected");
        }
        let unit = if tier.quantity == 1 { settings.product_name.clone() } else { format!("{}s", settings.product_name) };
        Element::new("div")
            .class(class)
            .attr("role", "radio")
            .attr("tabindex", "0")
            .attr("aria-checked", if index == selected { "true" } else { "false" })
            .attr("data-quantity", tier.quantity.to_string())
            .child_if(tier.popular, || Element::new("span").class("wh-pricing-badge").text(settings.popular_label.clone()))
            .child(Element::new("div").class("wh-pricing-quantity").text(format!("{} {unit}", tier.quantity)))
            .child(
                Element::new("div")
                    .class("wh-pricing-unit")
                    .text(format!("{} each", style::money(&settings.currency, tier.price_per_unit))),
            )
            .child(Element::new("div").class("wh-pricing-total").text(style::money(&settings.currency, quote.total)))
            .child_if(settings.show_savings && quote.shows_savings(), || {
                Element::new("span").class("wh-pricing-savings").text(quote.savings_label(&settings.currency))
            })
    });

    let cta_label = quotes.get(selected).map_or_else(
        || settings.cta_text.clone(),
        |quote| format!("{} - {}", settings.cta_text, style::money(&settings.currency, quote.total)),
    );
    let cta_quantity = settings.tiers.get(selected).map_or(1, |tier| tier.quantity);

    let root = Element::new("div")
        .id(id)
        .class("wh-pricing")
        .child_if(!settings.title.trim().is_empty(), || Element::new("h2").class("wh-pricing-title").text(settings.title.clone()))
        .child_if(!settings.subtitle.trim().is_empty(), || {
            Element::new("p").class("wh-pricing-subtitle").text(settings.subtitle.clone())
        })
        .child(Element::new("div").class("wh-pricing-tiers").attr("role", "radiogroup").children(tiers))
        .child(
            Element::new("a")
                .class("wh-pricing-cta")
                .attr("href", safe_url(&settings.cta_url))
                .attr("data-quantity", cta_quantity.to_string())
                .text(cta_label),
        );

    WidgetView {
        kind: WidgetKind::PricingTable,
        instance_id: id.to_string(),
        root,
        styles: stylesheet(settings, id),
        script: Some(Script::new(id, json!({ "ctaText": settings.cta_text }), SCRIPT)),
    }
}

fn stylesheet(s: &PricingSettings, id: &str) -> Stylesheet {
    let radius = style::px(s.border_radius);
    let columns = format!("repeat({}, minmax(0, 1fr))", s.tiers.len().max(1));

    let mut sheet = Stylesheet::new();
    sheet.rule(
        scoped(id, ""),
        decls([
            ("padding", "32px 16px"),
            ("background", &s.background_color),
            ("color", &s.text_color),
            ("font-family", FONT_STACK),
            ("text-align", "center"),
            ("border-radius", &radius),
        ]),
    );
    sheet.rule(scoped(id, ".wh-pricing-title"), decls([("margin", "0 0 4px"), ("font-size", "24px")]));
    sheet.rule(scoped(id, ".wh-pricing-subtitle"), decls([("margin", "0 0 24px"), ("opacity", "0.7")]));
    sheet.rule(
        scoped(id, ".wh-pricing-tiers"),
        decls([
            ("display", "grid"),
            ("grid-template-columns", &columns),
            ("gap", "16px"),
            ("max-width", "960px"),
            ("margin", "0 auto 24px"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-pricing-tier"),
        decls([
            ("position", "relative"),
            ("padding", "24px 16px"),
            ("background", &s.card_color),
            ("border", "1px solid #e5e7eb"),
            ("border-radius", &radius),
            ("box-shadow", style::card_shadow(false)),
            ("cursor", "pointer"),
        ]),
    );
    sheet.rule(scoped(id, ".wh-pricing-tier.is-popular"), decls([("border", &format!("2px solid {}", s.accent_color))]));
    sheet.rule(
        scoped(id, ".wh-pricing-tier.is-selected"),
        decls([("outline", &format!("3px solid {}", s.accent_color)), ("outline-offset", "2px")]),
    );
    sheet.rule(
        scoped(id, ".wh-pricing-badge"),
        decls([
            ("position", "absolute"),
            ("top", "-12px"),
            ("left", "50%"),
            ("transform", "translateX(-50%)"),
            ("padding", "2px 10px"),
            ("border-radius", "999px"),
            ("background", &s.accent_color),
            ("color", "#ffffff"),
            ("font-size", "12px"),
            ("font-weight", "600"),
            ("white-space", "nowrap"),
        ]),
    );
    sheet.rule(scoped(id, ".wh-pricing-quantity"), decls([("font-weight", "600"), ("font-size", "18px")]));
    sheet.rule(scoped(id, ".wh-pricing-unit"), decls([("margin-top", "4px"), ("opacity", "0.7")]));
    sheet.rule(scoped(id, ".wh-pricing-total"), decls([("margin-top", "8px"), ("font-size", "28px"), ("font-weight", "700")]));
    sheet.rule(
        scoped(id, ".wh-pricing-savings"),
        decls([
            ("display", "inline-block"),
            ("margin-top", "8px"),
            ("padding", "2px 8px"),
            ("border-radius", "4px"),
            ("background", "#dcfce7"),
            ("color", "#166534"),
            ("font-size", "12px"),
            ("font-weight", "600"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-pricing-cta"),
        decls([
            ("display", "inline-block"),
            ("padding", "12px 32px"),
            ("border-radius", &radius),
            ("background", &s.accent_color),
            ("color", "#ffffff"),
            ("font-weight", "600"),
            ("text-decoration", "none"),
        ]),
    );
    sheet.media(
        MOBILE_BREAKPOINT,
        vec![Rule { selector: scoped(id, ".wh-pricing-tiers"), decls: decls([("grid-template-columns", "1fr")]) }],
    );
    sheet
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<PricingSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: PricingSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::PricingTable, &decoded)?;
    Ok(view(&decoded, &id, mode))
}

/// Remove one tier, keeping at least one.
///
/// # Errors
///
/// Returns [`WidgetError::LastItem`] when only one tier is left.
pub fn remove_item(settings: &Value, index: usize) -> Result<Value, WidgetError> {
    remove_from(settings, index, "pricing tier", tiers_of)
}

/// Append a new tier. `variant` is unused; pricing tiers have one shape.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn add_item(settings: &Value, _variant: Option<&str>) -> Result<Value, WidgetError> {
    edit(settings, |decoded: &mut PricingSettings| {
        decoded.add_tier();
        Ok(())
    })
}

/// Move one tier from `from` to `to`.
///
/// # Errors
///
/// Returns [`WidgetError::IndexOutOfRange`] if either index is invalid.
pub fn move_item(settings: &Value, from: usize, to: usize) -> Result<Value, WidgetError> {
    move_within(settings, from, to, tiers_of)
}

fn tiers_of(settings: &mut PricingSettings) -> &mut Vec<PricingTier> {
    &mut settings.tiers
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
