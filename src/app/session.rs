use crate::adapters::headless::HeadlessMap;
use crate::core::controller::StoreSyncController;
use crate::core::view;
use crate::domain::model::{LatLng, LoadStatus, Place, StoreId};
use crate::domain::ports::FeedSource;
use crate::utils::error::{LocatorError, Result};

pub const HELP: &str = "\
Commands:
  list                     show the store list
  select <row>             open a store from the list (1-based row)
  click <row>              click the map marker of a store
  place <lat> <lng> [name] pick a searched place
  place                    pick a place the provider could not resolve
  close                    close the info window
  status                   show map center, zoom and the open store
  reload                   retry a failed store feed
  help                     show this help
  quit                     exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Select(usize),
    Click(usize),
    Place(Place),
    Close,
    Status,
    Reload,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(command_error("empty command"));
        };
        let args: Vec<&str> = parts.collect();

        match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => no_args(verb, &args, Command::List),
            "select" => Ok(Command::Select(parse_row(verb, &args)?)),
            "click" => Ok(Command::Click(parse_row(verb, &args)?)),
            "place" => parse_place(&args),
            "close" => no_args(verb, &args, Command::Close),
            "status" => no_args(verb, &args, Command::Status),
            "reload" | "retry" => no_args(verb, &args, Command::Reload),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(command_error(&format!("unknown command '{}'", other))),
        }
    }
}

fn command_error(message: &str) -> LocatorError {
    LocatorError::CommandError {
        message: message.to_string(),
    }
}

fn no_args(verb: &str, args: &[&str], command: Command) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(command_error(&format!("'{}' takes no arguments", verb)))
    }
}

fn parse_row(verb: &str, args: &[&str]) -> Result<usize> {
    match args {
        [row] => match row.parse::<usize>() {
            Ok(row) if row >= 1 => Ok(row),
            _ => Err(command_error(&format!("'{}' expects a row number from 1", verb))),
        },
        _ => Err(command_error(&format!("usage: {} <row>", verb))),
    }
}

fn row_index(row: usize) -> Result<usize> {
    row.checked_sub(1)
        .ok_or_else(|| command_error("rows are numbered from 1"))
}

fn parse_place(args: &[&str]) -> Result<Command> {
    match args {
        [] => Ok(Command::Place(Place::default())),
        [lat, lng, name @ ..] => {
            let lat: f64 = lat
                .parse()
                .map_err(|_| command_error(&format!("invalid latitude '{}'", lat)))?;
            let lng: f64 = lng
                .parse()
                .map_err(|_| command_error(&format!("invalid longitude '{}'", lng)))?;
            let location = LatLng::new(lat, lng);
            if !location.is_valid() {
                return Err(command_error(&format!("{} is not on the map", location)));
            }
            Ok(Command::Place(Place {
                name: (!name.is_empty()).then(|| name.join(" ")),
                location: Some(location),
            }))
        }
        _ => Err(command_error("usage: place [<lat> <lng> [name]]")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Continue(Vec<String>),
    Quit,
}

/// Console front end over the controller. Each command is one UI gesture.
pub struct Session {
    controller: StoreSyncController<HeadlessMap>,
    map: HeadlessMap,
    feed: Box<dyn FeedSource>,
}

impl Session {
    pub fn new(
        controller: StoreSyncController<HeadlessMap>,
        map: HeadlessMap,
        feed: Box<dyn FeedSource>,
    ) -> Self {
        Self {
            controller,
            map,
            feed,
        }
    }

    pub fn controller(&self) -> &StoreSyncController<HeadlessMap> {
        &self.controller
    }

    pub fn map(&self) -> &HeadlessMap {
        &self.map
    }

    pub async fn run_line(&mut self, line: &str) -> Result<Outcome> {
        let command = Command::parse(line)?;
        self.execute(command).await
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome> {
        let lines: Vec<String> = match command {
            Command::Quit => return Ok(Outcome::Quit),
            Command::Help => HELP.lines().map(str::to_string).collect(),
            Command::List => self.list(),
            Command::Select(row) => {
                let store = self.controller.select_row(row_index(row)?)?;
                view::render_store_details(store)
                    .lines()
                    .map(str::to_string)
                    .collect()
            }
            Command::Click(row) => self.click(row)?,
            Command::Place(place) => self.place(place),
            Command::Close => {
                if self.controller.deselect() {
                    vec!["Info window closed".to_string()]
                } else {
                    vec!["No store selected".to_string()]
                }
            }
            Command::Status => self.status(),
            Command::Reload => self.load_stores().await?,
        };
        Ok(Outcome::Continue(lines))
    }

    pub fn list(&self) -> Vec<String> {
        let rows = self.controller.sidebar();
        if let Some(message) = self.controller.empty_state() {
            let mut lines = vec![message];
            if matches!(self.controller.status(), LoadStatus::Failed { .. }) {
                lines.push("Run 'reload' to try again".to_string());
            }
            return lines;
        }

        let mut lines = vec![format!("Stores ({})", rows.len())];
        lines.extend(
            rows.iter()
                .enumerate()
                .map(|(i, row)| view::render_sidebar_row(i + 1, row)),
        );
        lines
    }

    fn click(&mut self, row: usize) -> Result<Vec<String>> {
        let marker = self
            .controller
            .marker_for(StoreId(row_index(row)?))
            .ok_or_else(|| LocatorError::UnknownStore {
                reference: format!("row {}", row),
            })?;
        self.map.click_marker(marker);
        self.controller.dispatch_pending();

        Ok(match self.controller.selected_store() {
            Some(store) => view::render_store_details(store)
                .lines()
                .map(str::to_string)
                .collect(),
            None => vec!["No store selected".to_string()],
        })
    }

    fn place(&mut self, place: Place) -> Vec<String> {
        let map = self.controller.map_handle();
        let has_location = place.location.is_some();
        self.map.choose_place(place);
        self.controller.dispatch_pending();

        match (has_location, self.map.center(map), self.map.zoom(map)) {
            (true, Some(center), Some(zoom)) => {
                vec![format!("Map centered on {} at zoom {}", center, zoom)]
            }
            _ => vec!["Place has no location, map unchanged".to_string()],
        }
    }

    fn status(&self) -> Vec<String> {
        let map = self.controller.map_handle();
        let mut lines = Vec::new();

        if let (Some(center), Some(zoom)) = (self.map.center(map), self.map.zoom(map)) {
            lines.push(format!("Map center: {} zoom {}", center, zoom));
        }
        match self.controller.status() {
            LoadStatus::Pending => lines.push("Stores: loading".to_string()),
            LoadStatus::Failed { message } => lines.push(format!("Stores: {}", message)),
            LoadStatus::Ready(report) => lines.push(format!(
                "Stores: {} loaded, {} skipped",
                report.accepted,
                report.rejected.len()
            )),
        }
        match self.controller.selected_store() {
            Some(store) => {
                lines.push("Open info window:".to_string());
                lines.extend(
                    view::render_store_details(store)
                        .lines()
                        .map(|line| format!("  {}", line)),
                );
            }
            None => lines.push("No store selected".to_string()),
        }
        lines
    }

    /// Fetch the feed and place the stores. Allowed again only after a failure.
    pub async fn load_stores(&mut self) -> Result<Vec<String>> {
        let report = self.controller.load_from(self.feed.as_ref()).await?;
        let mut lines = vec![format!(
            "Loaded {} stores ({} skipped)",
            report.accepted,
            report.rejected.len()
        )];
        lines.extend(
            report
                .rejected
                .iter()
                .cloned()
                .map(|r| format!("  {}", LocatorError::from(r))),
        );
        Ok(lines)
    }
}
