//! Capabilities the reconciler needs from a rendered line and its producer.

/// Invalidation hooks of a cached render handle. The reconciler calls these
/// on handles that stay in the window while their line changes; it never
/// inspects handles otherwise.
pub trait ContentInvalidatable {
    /// The line's text changed.
    fn on_content_changed(&mut self);
    /// The line's token/highlight metadata changed.
    fn on_tokens_changed(&mut self);
}

/// Produces fresh handles for lines that enter the window mid-range.
///
/// Any `FnMut() -> H` closure is a factory.
pub trait LineFactory<H> {
    fn create(&mut self) -> H;
}

impl<H, F> LineFactory<H> for F
where
    F: FnMut() -> H,
{
    fn create(&mut self) -> H {
        self()
    }
}
