/// Events emitted while the board ticks.
/// The presentation layer consumes these for sound.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoardEvent {
    /// A cell flapped on one of its clicking steps (every other flap).
    FlapClick,
}
