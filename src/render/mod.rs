//! Rendering boundary.
//!
//! Sessions know nothing about drawing. A `Renderer` receives a read-only
//! snapshot plus the catalog (for face text and hints) and draws however it
//! likes. `TextRenderer` is a plain-text implementation for terminals,
//! logs and tests.

mod text;

pub use text::TextRenderer;

use crate::cards::CardCatalog;
use crate::session::SessionSnapshot;

/// Draws a session table.
pub trait Renderer {
    /// Draw the table as it stands in `snapshot`.
    fn draw(&mut self, snapshot: &SessionSnapshot, catalog: &CardCatalog);
}
