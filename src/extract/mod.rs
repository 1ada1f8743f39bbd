pub mod source;
pub mod pdf;
pub mod links;

pub use source::PaperSource;
pub use pdf::PdfLinkExtractor;
pub use links::scan_github_links;
