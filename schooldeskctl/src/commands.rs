use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm as Prompt, console::Term};
use schooldesk_client::{
    ApiClient, ApiService, ClientConfig, DataGrid, DeleteOutcome, FetchOutcome, GridOptions,
    LogNotifier, Notifier, ScdDirectory, Session, SessionContext, SessionStore,
};
use schooldesk_core::screens::ScreenCatalog;
use schooldesk_model::{FilterSet, PaginationModel, Profile, RowId};
use tracing::{debug, info};

use crate::ListArgs;
use crate::render;

const DEFAULT_WIDTH: u16 = 120;

/// Overrides for where config and session live.
#[derive(Debug, Default)]
pub(crate) struct Paths {
    pub config: Option<PathBuf>,
    pub session: Option<PathBuf>,
}

impl Paths {
    fn load_config(&self) -> Result<ClientConfig> {
        match &self.config {
            Some(path) => ClientConfig::load_with_file(path)
                .with_context(|| format!("loading config {}", path.display())),
            None => ClientConfig::load().context("loading config"),
        }
    }

    fn open_session(&self) -> Result<SessionContext> {
        let store = match &self.session {
            Some(path) => SessionStore::at(path),
            None => SessionStore::new()?,
        };
        debug!(path = %store.path().display(), "opening session store");
        SessionContext::with_store(store).context("opening session")
    }
}

pub(crate) fn screens() -> Result<()> {
    let catalog = ScreenCatalog::standard();
    println!("{:<12} {:<16} {:<14} {:<14} DELETE", "KEY", "TITLE", "ENTITY", "MODE");
    for screen in catalog.iter() {
        let mode = serde_json::to_value(screen.request_mode)?;
        println!(
            "{:<12} {:<16} {:<14} {:<14} {}",
            screen.key,
            screen.title,
            screen.entity_name,
            mode.as_str().unwrap_or_default(),
            if screen.delete_path.is_some() { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub(crate) fn session_show(paths: &Paths) -> Result<()> {
    let context = paths.open_session()?;
    let Some(session) = context.snapshot() else {
        println!("Not signed in");
        return Ok(());
    };
    let profile = &session.profile;
    println!("{} ({})", profile.label(), profile.kind);
    println!("  account:  {}", profile.account_id);
    println!("  user:     {}", profile.user_id);
    println!(
        "  scope:    school={} class={} division={}",
        optional(profile.school_id),
        optional(profile.class_id),
        optional(profile.division_id)
    );
    if !profile.allocations.is_empty() {
        let allocations: Vec<String> = profile
            .allocations
            .iter()
            .map(|a| match a.division_id {
                Some(division) => format!("{}/{}", a.class_id, division),
                None => a.class_id.to_string(),
            })
            .collect();
        println!("  teaches:  {}", allocations.join(", "));
    }
    for entry in &profile.permissions {
        let actions: Vec<&str> = entry.actions.iter().map(|a| a.as_str()).collect();
        println!("  {:<14} {}", entry.entity_name, actions.join(","));
    }
    println!("  stored:   {}", session.stored_at.to_rfc3339());
    Ok(())
}

pub(crate) fn session_set(paths: &Paths, token: String, profile_path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(profile_path)
        .with_context(|| format!("reading profile {}", profile_path.display()))?;
    let profile: Profile = serde_json::from_str(&raw)
        .with_context(|| format!("parsing profile {}", profile_path.display()))?;

    let context = paths.open_session()?;
    let label = profile.label();
    let kind = profile.kind;
    context
        .sign_in(Session::new(token, profile))
        .context("storing session")?;
    println!("Signed in as {label} ({kind})");
    Ok(())
}

pub(crate) fn session_clear(paths: &Paths) -> Result<()> {
    paths.open_session()?.sign_out().context("clearing session")?;
    println!("Session cleared");
    Ok(())
}

struct Mounted {
    config: ClientConfig,
    api: Arc<dyn ApiService>,
    grid: DataGrid,
}

fn mount(paths: &Paths, screen_key: &str) -> Result<Mounted> {
    let config = paths.load_config()?;
    let screen = ScreenCatalog::standard().get(screen_key)?.clone();
    let session = paths.open_session()?;
    if !session.is_signed_in() {
        bail!("Not signed in; run `schooldeskctl session set` first");
    }

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let client = ApiClient::new(&config, session.clone(), Arc::clone(&notifier))?;
    let api: Arc<dyn ApiService> = Arc::new(client);
    let grid = DataGrid::new(
        screen,
        session,
        Arc::clone(&api),
        notifier,
        GridOptions::from(&config),
    );
    Ok(Mounted { config, api, grid })
}

pub(crate) async fn list(paths: &Paths, args: ListArgs) -> Result<()> {
    let filters = args
        .filters
        .iter()
        .map(|raw| {
            FilterSet::parse_assignment(raw).with_context(|| format!("invalid --filter {raw:?}"))
        })
        .collect::<Result<FilterSet>>()?;

    let Mounted { config, api, grid } = mount(paths, &args.screen)?;
    let pagination = PaginationModel::new(
        args.page,
        args.size.unwrap_or(config.default_page_size),
    )?;

    let mut grid = grid.with_query(pagination, args.search, filters);
    // An explicit command line is not a landing page.
    grid.skip_landing_load();
    grid.set_names(ScdDirectory::new(api, config.scd.clone()).prefetch().await);

    if let FetchOutcome::Failed(err) = grid.load().await? {
        return Err(anyhow::Error::new(err).context(format!("listing {}", args.screen)));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&grid.page())?);
    } else {
        print!("{}", render::render(&grid.view(args.width.unwrap_or(DEFAULT_WIDTH))));
    }
    Ok(())
}

pub(crate) async fn delete(paths: &Paths, screen_key: &str, id: &str, yes: bool) -> Result<()> {
    let row_id = RowId::parse(id).context("row id must not be empty")?;
    let Mounted { mut grid, .. } = mount(paths, screen_key)?;

    let confirm = |message: &str| {
        yes || Prompt::new()
            .with_prompt(message)
            .default(false)
            .interact_on(&Term::stderr())
            .unwrap_or(false)
    };

    match grid.delete_row(&row_id, &confirm).await {
        DeleteOutcome::Deleted => {
            info!(screen = screen_key, id = %row_id, "row deleted");
            println!("Deleted {screen_key} {row_id}");
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            println!("Cancelled");
            Ok(())
        }
        DeleteOutcome::Denied => bail!("Not permitted to delete from {screen_key}"),
        DeleteOutcome::Failed(err) => {
            Err(anyhow::Error::new(err).context(format!("deleting {screen_key} {row_id}")))
        }
    }
}

fn optional(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
