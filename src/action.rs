/// Every state mutation flows through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Resize,

    // Change navigation (crosses hunks, then files)
    NextChange,
    PreviousChange,

    // Change list
    ListUp,
    ListDown,
    ListTop,
    ListBottom,
    OpenSelected,

    // Editor pane
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,

    // Focus
    FocusList,
    FocusEditor,

    Refresh,
    ToggleLabels,
}
