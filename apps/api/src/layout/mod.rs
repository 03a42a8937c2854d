// Receipt page layout: font metrics, greedy wrapping, and row placement.
// Pure and synchronous; callers on the async side run it inside spawn_blocking.

pub mod composer;
pub mod font_metrics;
pub mod wrap;

pub use composer::{FieldSpec, LayoutPlan, PageLayoutComposer, TrailerText};
pub use font_metrics::{default_page_config, PageConfig, StaticMetrics, TextMeasure};
