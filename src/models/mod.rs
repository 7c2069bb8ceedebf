pub mod layout;
pub mod loaders;
pub mod routing_tag;
pub mod session;
pub mod transport;

pub use layout::{Page, PaginationGeometry, RenderJob, ReportMetadata};
pub use loaders::{load_font_face, load_selected_file, FontFace};
pub use routing_tag::RoutingTag;
pub use session::{SelectedFile, Session, SessionStatus, SubmissionInput};
pub use transport::{FailureKind, FailureReason, TransportRequest, TransportResult};
