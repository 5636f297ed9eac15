use crate::app::dialog::DialogInput;

/// Events that can occur in the application.
/// Handlers return these events instead of mutating app state directly.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // Table navigation
    SelectionUp,
    SelectionDown,
    PageUp(usize), // page size
    PageDown(usize),
    JumpToStart,
    JumpToEnd,

    // Query editor
    EditorChar(char),
    EditorNewline,
    EditorBackspace,
    EditorDelete,
    EditorLeft,
    EditorRight,
    EditorUp,
    EditorDown,
    EditorHome,
    EditorEnd,

    // Query commands
    RunQuery,
    ClearQuery,
    CycleTimeRange,

    // Dialogs
    OpenSaveDialog,
    OpenLoadDialog,
    OpenHistoryDialog,
    OpenColumnsDialog,
    OpenSearchDialog,
    ShowHelp,
    Dialog(DialogInput),

    // Search navigation
    NextMatch,
    PrevMatch,

    // Details pane
    GrowDetails,
    ShrinkDetails,
    ToggleDetails,

    Export,
    ToggleFocus,

    // System events
    Quit,
}
