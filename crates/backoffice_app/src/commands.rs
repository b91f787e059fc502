//! Line commands of the interactive driver.

use backoffice_core::{ItemType, Msg, SortKey, StatusFilter, TypeFilter};

pub const HELP: &str = "\
commands:
  refresh                    reload the list
  resource <slug>            roles | annonces | dons | favoris
  search [text]              filter by text (empty clears)
  type <all|type>            produit | don | echange | annonce
  status <all|status>        filter by status
  reset                      clear every filter and the selection
  sort <key> | sort off      sort by a column, again to flip
  page <n> | next | prev     move between pages
  size <n>                   rows per page
  select <id>                tick or untick one row
  page-all                   tick or untick the whole page
  clear                      untick everything
  do <action> <id>           run an action on one row
  bulk <action>              run an action on every ticked row
  dismiss                    hide the error and the notice
  show | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    /// Relative page move, resolved against the current page.
    Step(isize),
    Dismiss,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, try \"help\"")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid {what}: {value:?}")]
    Invalid { what: &'static str, value: String },
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "" | "show" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "next" => return Ok(Command::Step(1)),
        "prev" => return Ok(Command::Step(-1)),
        "dismiss" => return Ok(Command::Dismiss),
        "refresh" | "r" => Msg::RefreshRequested,
        "resource" => Msg::ResourceSelected(value(rest, "resource")?),
        "search" => Msg::SearchChanged(rest.to_string()),
        "type" => Msg::TypeFilterChanged(match required(rest, "type")? {
            "all" => TypeFilter::All,
            name => TypeFilter::Only(value::<ItemType>(name, "type")?),
        }),
        "status" => Msg::StatusFilterChanged(match required(rest, "status")? {
            "all" => StatusFilter::All,
            status => StatusFilter::Only(status.to_string()),
        }),
        "reset" => Msg::FiltersReset,
        "sort" => match required(rest, "sort")? {
            "off" | "none" => Msg::SortCleared,
            key => Msg::SortRequested(value::<SortKey>(key, "sort key")?),
        },
        "page" => Msg::PageRequested(value(rest, "page")?),
        "size" => Msg::PageSizeChanged(value(rest, "size")?),
        "select" => Msg::RowToggled(required(rest, "select")?.to_string()),
        "page-all" => Msg::VisibleToggled,
        "clear" => Msg::SelectionCleared,
        "do" => {
            let (action, id) = required(rest, "do")?
                .split_once(char::is_whitespace)
                .ok_or(CommandError::MissingArgument("do"))?;
            Msg::RowActionRequested {
                id: id.trim().to_string(),
                action: value(action, "action")?,
            }
        }
        "bulk" => Msg::BulkActionRequested(value(rest, "action")?),
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Command::Dispatch(msg))
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn value<T: std::str::FromStr>(text: &str, what: &'static str) -> Result<T, CommandError> {
    required(text, what)?
        .parse()
        .map_err(|_| CommandError::Invalid {
            what,
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{ActionKind, Resource};
    use pretty_assertions::assert_eq;

    fn msg(line: &str) -> Msg {
        match parse(line) {
            Ok(Command::Dispatch(msg)) => msg,
            other => panic!("{line:?} gave {other:?}"),
        }
    }

    #[test]
    fn list_commands() {
        assert_eq!(msg("refresh"), Msg::RefreshRequested);
        assert_eq!(msg("resource favoris"), Msg::ResourceSelected(Resource::Favoris));
        assert_eq!(msg("search  lampe de bureau "), Msg::SearchChanged("lampe de bureau".to_string()));
        assert_eq!(msg("search"), Msg::SearchChanged(String::new()));
        assert_eq!(msg("type don"), Msg::TypeFilterChanged(TypeFilter::Only(ItemType::Donation)));
        assert_eq!(msg("status all"), Msg::StatusFilterChanged(StatusFilter::All));
        assert_eq!(msg("sort created_at"), Msg::SortRequested(SortKey::CreatedAt));
        assert_eq!(msg("sort off"), Msg::SortCleared);
        assert_eq!(msg("page 3"), Msg::PageRequested(3));
        assert_eq!(parse("next"), Ok(Command::Step(1)));
    }

    #[test]
    fn selection_and_action_commands() {
        assert_eq!(msg("select a-1"), Msg::RowToggled("a-1".to_string()));
        assert_eq!(msg("page-all"), Msg::VisibleToggled);
        assert_eq!(
            msg("do publish a-7"),
            Msg::RowActionRequested {
                id: "a-7".to_string(),
                action: ActionKind::Publish
            }
        );
        assert_eq!(msg("bulk block"), Msg::BulkActionRequested(ActionKind::Block));
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(parse("fly"), Err(CommandError::Unknown("fly".to_string())));
        assert_eq!(parse("select"), Err(CommandError::MissingArgument("select")));
        assert_eq!(parse("do publish"), Err(CommandError::MissingArgument("do")));
        assert_eq!(
            parse("page two"),
            Err(CommandError::Invalid {
                what: "page",
                value: "two".to_string()
            })
        );
        assert!(parse("bulk explode").is_err());
        assert_eq!(parse("   "), Ok(Command::Show));
    }
}
