// Resume screening: skill catalog, per-resume pipeline, uploads, CSV report, HTTP handlers.
// Text and entity extraction live in `extraction`; nothing here touches the model directly.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod skills;
pub mod uploads;
