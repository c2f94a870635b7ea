pub mod terminal;
pub mod vscode_bridge;
