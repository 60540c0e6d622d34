//! Help text for layout manager console commands.

pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => overview(),
        Some(t) => {
            if let Some(text) = command_help(t) {
                return text;
            }
            if let Some(text) = group_help(t) {
                return text;
            }
            format!("Unknown help topic: '{}'. Run 'help' for a list of commands.", t)
        }
    }
}


fn overview() -> String {
    "\
Layout manager — named page layouts for one map document

Usage: <command> [args...]

Commands:
  status                     Show the active layout and settings
  help [topic]               Show help

Layout commands:
  create <name>              Save the current page as a new layout
  switch <name>              Apply a saved layout to the page
  update [name]              Re-save the active (or named) layout
  list                       List saved layouts
  save                       Write all layouts to the sidecar file

Run 'help <command>' for detailed help on a specific command."
        .into()
}


fn group_help(group: &str) -> Option<String> {
    let text = match group {
        "layout" => "\
Layout commands — capture and restore page layouts

  create <name>
    Capture every layout element and layer into a new layout and make it
    active. Unnamed elements are given generated names.

  switch <name>
    Apply a saved layout. With auto-save on, the active layout is saved
    first. Elements the layout does not know about are moved off the page
    unless move_missing_off_screen is off.

  update [name]
    Capture the page again over the active layout, or over <name>.

  list
    List saved layouts in creation order.

  save
    Write all layouts to <document>_layout.json.",

        _ => return None,
    };
    Some(text.into())
}


fn command_help(command: &str) -> Option<String> {
    let text = match command {
        "status" => "status — show the active layout and settings\n\nUsage: status",
        "help" => "help — show help\n\nUsage: help [topic]",
        "create" | "layout.create" => "create — save the page as a new layout\n\nUsage: create <name>",
        "switch" | "layout.switch" => "switch — apply a saved layout\n\nUsage: switch <name>",
        "update" | "layout.update" => "update — re-save a layout from the page\n\nUsage: update [name]",
        "list" | "layout.list" => "list — list saved layouts\n\nUsage: list",
        "save" | "layout.save" => "save — write layouts to the sidecar file\n\nUsage: save",
        _ => return None,
    };
    Some(text.into())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_lists_layout_commands() {
        let text = help_text(None);
        assert!(text.contains("Layout commands:"));
        assert!(text.contains("switch <name>"));
    }

    #[test]
    fn group_help_layout() {
        let text = help_text(Some("layout"));
        assert!(text.contains("create <name>"));
        assert!(text.contains("move_missing_off_screen"));
    }

    #[test]
    fn command_help_accepts_tagged_name() {
        assert_eq!(help_text(Some("switch")), help_text(Some("layout.switch")));
        assert!(help_text(Some("update")).contains("Usage:"));
    }

    #[test]
    fn unknown_topic() {
        let text = help_text(Some("bogus"));
        assert!(text.contains("Unknown help topic"));
    }
}
