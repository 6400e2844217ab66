//! # loadspread reporting sink
//!
//! Turns a frequency table or a load series into a persisted artifact.
//!
//! - **Charts**: bar charts (identifier vs. count) and line charts
//!   (server count vs. average load) rendered to SVG with `plotters`
//! - **Data formats**: the same chart data as pretty JSON or CSV
//! - **Path templates**: destinations are Handlebars templates rendered per
//!   delivery, so one sink can write one file per scaling round
//!
//! ## Example
//!
//! ```rust,no_run
//! use loadspread_output::{Chart, FilesystemSink, ReportContext, ReportSink};
//! use loadspread_config::ReportConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = FilesystemSink::series(&ReportConfig::default());
//! let chart = Chart::load_curve("Average Server Load for N = 3", vec![(2, 50.0), (3, 33.3)]);
//! let context = ReportContext::new().with_variable("servers", 3);
//! let receipt = sink.deliver(&chart, &context).await?;
//! println!("wrote {}", receipt.path.display());
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod destination;
pub mod destinations;
pub mod errors;
pub mod template;

pub use chart::{Chart, ChartData};
pub use destination::{ReportContext, ReportReceipt, ReportSink};
pub use destinations::{FilesystemSink, FilesystemSinkConfig};
pub use errors::OutputError;
pub use template::TemplateEngine;

pub use loadspread_config::ReportFormat;
