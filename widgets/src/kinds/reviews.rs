//! Google reviews display.
//!
//! DESIGN
//! ======
//! Reviews are filtered by minimum rating and truncated before rendering.
//! Every layout shares one markup tree; the layout only switches the CSS
//! strategy, plus carousel navigation and slider rotation in the script.

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

const WRITE_REVIEW_URL: &str = "https://search.google.com/local/writereview?placeid=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub id: u32,
    pub author: String,
    pub rating: u8,
    pub text: String,
    /// Display date as provided by the source, e.g. "2 weeks ago".
    pub date: String,
    pub avatar_url: String,
}

impl Default for Review {
    fn default() -> Self {
        Self {
            id: 1,
            author: "New reviewer".into(),
            rating: 5,
            text: "Great experience!".into(),
            date: "just now".into(),
            avatar_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewLayout {
    #[default]
    Grid,
    List,
    Carousel,
    Masonry,
    Slider,
    Badge,
}

impl ReviewLayout {
    pub const ALL: [Self; 6] = [Self::Grid, Self::List, Self::Carousel, Self::Masonry, Self::Slider, Self::Badge];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
            Self::Carousel => "carousel",
            Self::Masonry => "masonry",
            Self::Slider => "slider",
            Self::Badge => "badge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsSettings {
    pub business_name: String,
    pub place_id: String,
    pub reviews: Vec<Review>,
    pub layout: ReviewLayout,
    pub min_rating: u8,
    pub max_reviews: usize,
    pub columns: u32,
    pub show_summary: bool,
    pub show_avatars: bool,
    pub show_dates: bool,
    pub show_write_review: bool,
    pub autoplay_seconds: f64,
    pub star_color: String,
    pub card_color: String,
    pub background_color: String,
    pub text_color: String,
    pub border_radius: f64,
}

impl Default for ReviewsSettings {
    fn default() -> Self {
        Self {
            business_name: "Your Business".into(),
            place_id: String::new(),
            reviews: mock_reviews(),
            layout: ReviewLayout::Grid,
            min_rating: 4,
            max_reviews: 6,
            columns: 3,
            show_summary: true,
            show_avatars: true,
            show_dates: true,
            show_write_review: true,
            autoplay_seconds: 5.0,
            star_color: "#fbbc04".into(),
            card_color: "#ffffff".into(),
            background_color: "#f9fafb".into(),
            text_color: "#202124".into(),
            border_radius: 12.0,
        }
    }
}

impl ReviewsSettings {
    pub fn add_review(&mut self) -> &mut Review {
        let id = list::next_id(&self.reviews, |review| review.id);
        self.reviews.push(Review { id, ..Review::default() });
        let last = self.reviews.len() - 1;
        &mut self.reviews[last]
    }

    #[must_use]
    pub fn visible_reviews(&self) -> Vec<&Review> {
        select_reviews(&self.reviews, self.min_rating, self.max_reviews)
    }

    #[must_use]
    pub fn write_review_url(&self) -> Option<String> {
        let place_id = self.place_id.trim();
        (!place_id.is_empty()).then(|| format!("{WRITE_REVIEW_URL}{}", urlencoding::encode(place_id)))
    }
}

/// Keep reviews rated at least `min_rating`, in order, up to `max_reviews`.
#[must_use]
pub fn select_reviews(reviews: &[Review], min_rating: u8, max_reviews: usize) -> Vec<&Review> {
    reviews.iter().filter(|review| review.rating >= min_rating).take(max_reviews).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    /// Average over all reviews, before filtering. Empty input averages to 0.
    #[must_use]
    pub fn of(reviews: &[Review]) -> Self {
        let count = reviews.len();
        if count == 0 {
            return Self { average: 0.0, count };
        }
        let sum: u32 = reviews.iter().map(|review| u32::from(review.rating.min(5))).sum();
        #[allow(clippy::cast_precision_loss)]
        let average = f64::from(sum) / count as f64;
        Self { average, count }
    }

    #[must_use]
    pub fn rounded_stars(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let stars = self.average.round().clamp(0.0, 5.0) as u8;
        stars
    }
}

/// Demo reviews used for new widgets and when a places lookup is unavailable.
#[must_use]
pub fn mock_reviews() -> Vec<Review> {
    [
        ("Sarah Johnson", 5, "Absolutely wonderful service! The team went above and beyond.", "2 weeks ago"),
        ("Michael Chen", 5, "Best experience I've had. Highly recommend to anyone.", "1 month ago"),
        ("Emily Rodriguez", 4, "Great quality and friendly staff. Will definitely come back.", "1 month ago"),
        ("David Kim", 5, "Fast, professional and fairly priced. Five stars.", "2 months ago"),
        ("Jessica Taylor", 4, "Very good overall, a short wait but worth it.", "3 months ago"),
        ("Robert Wilson", 3, "Decent, though there is room for improvement.", "4 months ago"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((author, rating, text, date), id)| Review {
        id,
        author: author.into(),
        rating,
        text: text.into(),
        date: date.into(),
        avatar_url: String::new(),
    })
    .collect()
}

fn initials(name: &str) -> String {
    name.split_whitespace().filter_map(|part| part.chars().next()).take(2).collect::<String>().to_uppercase()
}

// =============================================================================
// VIEW
// =============================================================================

const SCRIPT: &str = r"
var track = root.querySelector('.wh-reviews-track');
var cards = root.querySelectorAll('.wh-review');
if (!track || cards.length === 0) return;
var index = 0;
function show(next) {
  index = (next + cards.length) % cards.length;
  if (cfg.layout === 'slider') {
    Array.prototype.forEach.call(cards, function (card, i) {
      card.classList.toggle('is-active', i === index);
    });
  } else {
    track.scrollTo({ left: cards[index].offsetLeft - track.offsetLeft, behavior: 'smooth' });
  }
}
var prev = root.querySelector('.wh-reviews-prev');
var next = root.querySelector('.wh-reviews-next');
if (prev) prev.addEventListener('click', function () { show(index - 1); });
if (next) next.addEventListener('click', function () { show(index + 1); });
if (cfg.layout === 'slider' && cfg.autoplayMs > 0 && cards.length > 1) {
  var timer = setInterval(function () { show(index + 1); }, cfg.autoplayMs);
  root.addEventListener('mouseenter', function () { clearInterval(timer); });
  root.addEventListener('mouseleave', function () {
    timer = setInterval(function () { show(index + 1); }, cfg.autoplayMs);
  });
}
";

fn review_card(settings: &ReviewsSettings, review: &Review, active: bool) -> Element {
    Element::new("article")
        .class(if active { "wh-review is-active" } else { "wh-review" })
        .child(
            Element::new("div")
                .class("wh-review-header")
                .child_if(settings.show_avatars, || {
                    if review.avatar_url.trim().is_empty() {
                        Element::new("span").class("wh-review-avatar").attr("aria-hidden", "true").text(initials(&review.author))
                    } else {
                        Element::new("img")
                            .class("wh-review-avatar")
                            .attr("src", safe_url(&review.avatar_url))
                            .attr("alt", "")
                            .attr("loading", "lazy")
                    }
                })
                .child(
                    Element::new("div")
                        .child(Element::new("div").class("wh-review-author").text(review.author.clone()))
                        .child_if(settings.show_dates && !review.date.is_empty(), || {
                            Element::new("div").class("wh-review-date").text(review.date.clone())
                        }),
                ),
        )
        .child(
            Element::new("div")
                .class("wh-review-stars")
                .attr("aria-label", format!("{} out of 5 stars", review.rating.min(5)))
                .text(style::stars(review.rating)),
        )
        .child(Element::new("p").class("wh-review-text").text(review.text.clone()))
}

#[must_use]
pub fn view(settings: &ReviewsSettings, id: &str, _mode: RenderMode) -> WidgetView {
    let layout = settings.layout;
    let visible = settings.visible_reviews();
    let summary = RatingSummary::of(&settings.reviews);
    let navigable = matches!(layout, ReviewLayout::Carousel | ReviewLayout::Slider);

    let summary_el = || {
        Element::new("div")
            .class("wh-reviews-summary")
            .child(Element::new("div").class("wh-reviews-business").text(settings.business_name.clone()))
            .child(
                Element::new("div")
                    .class("wh-reviews-average")
                    .child(Element::new("span").class("wh-reviews-score").text(format!("{:.1}", summary.average)))
                    .child(Element::new("span").class("wh-review-stars").text(style::stars(summary.rounded_stars())))
                    .child(Element::new("span").class("wh-reviews-count").text(format!("({} reviews)", summary.count))),
            )
    };

    let cards = visible.iter().enumerate().map(|(index, review)| review_card(settings, review, index == 0 && layout == ReviewLayout::Slider));

    let root = Element::new("div")
        .id(id)
        .class(format!("wh-reviews wh-reviews-{}", layout.as_str()))
        .child_if(settings.show_summary || layout == ReviewLayout::Badge, summary_el)
        .child(Element::new("div").class("wh-reviews-track").children(cards))
        .child_if(navigable && visible.len() > 1, || {
            Element::new("div")
                .class("wh-reviews-nav")
                .child(Element::new("button").class("wh-reviews-prev").attr("type", "button").attr("aria-label", "Previous review").text("‹"))
                .child(Element::new("button").class("wh-reviews-next").attr("type", "button").attr("aria-label", "Next review").text("›"))
        })
        .children(settings.write_review_url().filter(|_| settings.show_write_review).map(|url| {
            Element::new("a")
                .class("wh-reviews-write")
                .attr("href", safe_url(&url))
                .attr("target", "_blank")
                .attr("rel", "noopener")
                .text("Write a review")
        }));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let autoplay_ms = (settings.autoplay_seconds.max(0.0) * 1000.0).round() as u64;

    WidgetView {
        kind: WidgetKind::Reviews,
        instance_id: id.to_string(),
        root,
        styles: stylesheet(settings, id),
        script: navigable.then(|| Script::new(id, json!({ "layout": layout.as_str(), "autoplayMs": autoplay_ms }), SCRIPT)),
    }
}

fn stylesheet(s: &ReviewsSettings, id: &str) -> Stylesheet {
    let radius = style::px(s.border_radius);
    let columns = format!("repeat({}, minmax(0, 1fr))", s.columns.max(1));

    let mut sheet = Stylesheet::new();
    sheet.rule(
        scoped(id, ""),
        decls([
            ("padding", "24px"),
            ("background", &s.background_color),
            ("color", &s.text_color),
            ("font-family", FONT_STACK),
            ("border-radius", &radius),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-reviews-summary"),
        decls([("display", "flex"), ("flex-direction", "column"), ("align-items", "center"), ("gap", "4px"), ("margin-bottom", "20px")]),
    );
    sheet.rule(scoped(id, ".wh-reviews-business"), decls([("font-size", "20px"), ("font-weight", "600")]));
    sheet.rule(scoped(id, ".wh-reviews-average"), decls([("display", "flex"), ("align-items", "center"), ("gap", "8px")]));
    sheet.rule(scoped(id, ".wh-reviews-score"), decls([("font-size", "28px"), ("font-weight", "700")]));
    sheet.rule(scoped(id, ".wh-reviews-count"), decls([("opacity", "0.7"), ("font-size", "14px")]));
    sheet.rule(
        scoped(id, ".wh-review"),
        decls([
            ("padding", "16px"),
            ("background", &s.card_color),
            ("border-radius", &radius),
            ("box-shadow", style::card_shadow(false)),
            ("box-sizing", "border-box"),
        ]),
    );
    sheet.rule(scoped(id, ".wh-review-header"), decls([("display", "flex"), ("align-items", "center"), ("gap", "10px"), ("margin-bottom", "8px")]));
    sheet.rule(
        scoped(id, ".wh-review-avatar"),
        decls([
            ("display", "inline-flex"),
            ("align-items", "center"),
            ("justify-content", "center"),
            ("width", "40px"),
            ("height", "40px"),
            ("border-radius", "50%"),
            ("background", "#e8eaed"),
            ("object-fit", "cover"),
            ("font-weight", "600"),
        ]),
    );
    sheet.rule(scoped(id, ".wh-review-author"), decls([("font-weight", "600")]));
    sheet.rule(scoped(id, ".wh-review-date"), decls([("font-size", "12px"), ("opacity", "0.6")]));
    sheet.rule(scoped(id, ".wh-review-stars"), decls([("color", &s.star_color), ("letter-spacing", "2px")]));
    sheet.rule(scoped(id, ".wh-review-text"), decls([("margin", "8px 0 0"), ("line-height", "1.5")]));
    sheet.rule(
        scoped(id, ".wh-reviews-nav"),
        decls([("display", "flex"), ("justify-content", "center"), ("gap", "8px"), ("margin-top", "12px")]),
    );
    sheet.rule(
        scoped(id, ".wh-reviews-nav button"),
        decls([
            ("width", "36px"),
            ("height", "36px"),
            ("border", "1px solid #dadce0"),
            ("border-radius", "50%"),
            ("background", &s.card_color),
            ("font-size", "20px"),
            ("cursor", "pointer"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-reviews-write"),
        decls([("display", "block"), ("margin-top", "16px"), ("text-align", "center"), ("color", "#1a73e8"), ("font-weight", "600")]),
    );

    let track = scoped(id, ".wh-reviews-track");
    let track_decls = match s.layout {
        ReviewLayout::Grid => decls([("display", "grid"), ("grid-template-columns", &columns), ("gap", "16px")]),
        ReviewLayout::List => decls([("display", "flex"), ("flex-direction", "column"), ("gap", "12px")]),
        ReviewLayout::Carousel => decls([
            ("display", "grid"),
            ("grid-auto-flow", "column"),
            ("grid-auto-columns", "minmax(280px, 1fr)"),
            ("gap", "16px"),
            ("overflow-x", "auto"),
            ("scroll-snap-type", "x mandatory"),
        ]),
        ReviewLayout::Masonry => decls([("column-count", &s.columns.max(1).to_string()), ("column-gap", "16px")]),
        ReviewLayout::Slider => decls([("position", "relative"), ("max-width", "640px"), ("margin", "0 auto")]),
        ReviewLayout::Badge => decls([("display", "none")]),
    };
    sheet.rule(track.clone(), track_decls);

    match s.layout {
        ReviewLayout::Carousel => sheet.rule(scoped(id, ".wh-review"), decls([("scroll-snap-align", "start")])),
        ReviewLayout::Masonry => {
            sheet.rule(scoped(id, ".wh-review"), decls([("break-inside", "avoid"), ("margin-bottom", "16px")]));
        }
        ReviewLayout::Slider => {
            sheet.rule(scoped(id, ".wh-review"), decls([("display", "none")]));
            sheet.rule(scoped(id, ".wh-review.is-active"), decls([("display", "block")]));
        }
        ReviewLayout::Badge => {
            sheet.rule(
                scoped(id, ""),
                decls([("display", "inline-block"), ("padding", "12px 20px"), ("box-shadow", style::card_shadow(true))]),
            );
            sheet.rule(scoped(id, ".wh-reviews-summary"), decls([("margin-bottom", "0")]));
        }
        ReviewLayout::Grid | ReviewLayout::List => {}
    }

    if matches!(s.layout, ReviewLayout::Grid | ReviewLayout::Masonry) {
        let mobile = match s.layout {
            ReviewLayout::Masonry => decls([("column-count", "1")]),
            _ => decls([("grid-template-columns", "1fr")]),
        };
        sheet.media(MOBILE_BREAKPOINT, vec![Rule { selector: track, decls: mobile }]);
    }
    sheet
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<ReviewsSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: ReviewsSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::Reviews, &decoded)?;
    Ok(view(&decoded, &id, mode))
}

/// Remove one review, keeping at least one.
///
/// # Errors
///
/// Returns [`WidgetError::LastItem`] when only one review is left.
pub fn remove_item(settings: &Value, index: usize) -> Result<Value, WidgetError> {
    remove_from(settings, index, "review", reviews_of)
}

/// Append a new review. `variant` is unused; reviews have one shape.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn add_item(settings: &Value, _variant: Option<&str>) -> Result<Value, WidgetError> {
    edit(settings, |decoded: &mut ReviewsSettings| {
        decoded.add_review();
        Ok(())
    })
}

/// Move one review from `from` to `to`.
///
/// # Errors
///
/// Returns [`WidgetError::IndexOutOfRange`] if either index is invalid.
pub fn move_item(settings: &Value, from: usize, to: usize) -> Result<Value, WidgetError> {
    move_within(settings, from, to, reviews_of)
}

fn reviews_of(settings: &mut ReviewsSettings) -> &mut Vec<Review> {
    &mut settings.reviews
}

#[cfg(test)]
#[path = "reviews_test.rs"]
mod tests;
