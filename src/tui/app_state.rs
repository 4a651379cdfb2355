#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum AppMode {
    Normal,
    Filtering,
}
