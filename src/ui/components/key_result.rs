/// What a component did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed, with an event for the parent
  Event(T),
  /// Not consumed; the parent tries its next handler
  NotHandled,
}
