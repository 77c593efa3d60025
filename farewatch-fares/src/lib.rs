pub mod deeplink;
pub mod archive;
pub mod html_extractor;

pub use deeplink::DeeplinkFareLookup;
pub use archive::SnapshotArchive;
pub use html_extractor::{ExtractorError, HtmlPriceExtractor};
