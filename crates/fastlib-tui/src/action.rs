use fastlib_client::Medium;

/// Everything the user can ask the app to do, independent of key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    DrillIn,
    NavigateBack,
    GoHome,
    GoAuthors,
    GoBooks,
    GoSeries,
    OpenConfig,
    /// Tab: next config section, or switch focus between list and search results.
    Tab,

    // Screen actions
    Retry,
    Create,
    StartSearch,
    RefreshAuthorBooks,
    OpenDropdown(Medium),

    // Config screen
    Toggle,
    SaveConfig,
    ResetConfig,
    ReloadConfig,
    RawEditor,
    Remove,
    Validate,
    Yes,

    // Text entry
    InputChar(char),
    InputBackspace,
    InputNewline,
    InputConfirm,
    InputCancel,

    ToggleHelp,
    Quit,
    ForceQuit,
    Resize(u16, u16),
    Tick,
    None,
}
