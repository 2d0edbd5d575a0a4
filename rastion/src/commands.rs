//! Command handlers: one function per subcommand, rendering to stdout.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::PathBuf;
use std::{fs, io};

use anyhow::{Context, Result, bail};
use rastion_catalog::{CatalogItem, HubClient, ItemKind, ListQuery, Page, resolve_category};
use tracing::debug;

use crate::cli::{AuthCommand, DownloadArgs, ItemArgs, LoginArgs, RateArgs, SearchArgs};
use crate::config::{self, Config};

const DEFAULT_DESCRIPTION: &str = "<no description provided>";
const DESCRIPTION_WIDTH: usize = 60;

pub async fn search(client: &HubClient, args: SearchArgs) -> Result<()> {
    let kind = if args.plugins {
        ItemKind::DecisionPlugin
    } else {
        ItemKind::Solver
    };

    if args.all {
        let items = client
            .list_all(kind, args.term.as_deref(), args.category.as_deref())
            .await?;
        if items.is_empty() {
            println!("No {} found.", kind.plural());
            return Ok(());
        }
        print!("{}", render_items(kind, &items));
        println!("{} {}", items.len(), kind.plural());
        return Ok(());
    }

    let query = ListQuery {
        query: args.term,
        category: args.category,
        page: args.page,
        page_size: args.page_size,
    };
    let page = client.list(kind, &query).await?;
    if page.items.is_empty() {
        println!("No {} found.", kind.plural());
        return Ok(());
    }
    print!("{}", render_items(kind, &page.items));
    println!("{}", render_footer(kind, &page));
    Ok(())
}

pub async fn show(client: &HubClient, args: ItemArgs) -> Result<()> {
    let item = client.get(args.kind, args.id).await?;
    let category = resolve_category(args.kind, &item);

    println!("{} {}", item.name, item.version);
    println!("  kind:      {}", args.kind);
    println!("  category:  {category}");
    println!("  owner:     {}", item.owner.username);
    println!("  downloads: {}", item.download_count);
    println!("  rating:    {:.2}", item.rating);
    if item.description.trim().is_empty() {
        println!("  {DEFAULT_DESCRIPTION}");
    } else {
        println!();
        println!("  {}", item.description.trim());
    }
    Ok(())
}

pub async fn download(client: &HubClient, args: DownloadArgs) -> Result<()> {
    let ItemArgs { kind, id } = args.item;
    let path = match args.output {
        Some(path) => path,
        None => {
            let item = client.get(kind, id).await?;
            PathBuf::from(format!(
                "{}-{}.zip",
                sanitize_name(&item.name),
                sanitize_name(&item.version)
            ))
        },
    };

    let bytes = client.download(kind, id).await?;
    fs::write(&path, &bytes).with_context(|| format!("Could not write {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "archive written");
    println!("Wrote {} ({} bytes).", path.display(), bytes.len());
    Ok(())
}

pub async fn rate(client: &HubClient, args: RateArgs) -> Result<()> {
    let summary = client.rate(args.item.kind, args.item.id, args.rating).await?;
    println!(
        "{} {} now rated {:.2} across {} ratings.",
        summary.item_type, summary.id, summary.rating, summary.rating_count
    );
    Ok(())
}

pub async fn auth(client: &HubClient, config: &Config, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Url => {
            println!("{}", client.login_url().await?);
        },
        AuthCommand::Login(LoginArgs { token }) => {
            let token = match token {
                Some(token) => token,
                None => prompt_token()?,
            };
            let verification = client.verify_token(&token).await?;
            if !verification.valid {
                bail!("That token was rejected by the hub. Start over with 'rastion auth url'.");
            }
            let path = config::persist_token(Some(token.trim()))?;
            let username = verification
                .user
                .map(|user| user.username)
                .unwrap_or_else(|| "unknown user".to_string());
            println!("Signed in as {username}. Token stored in {}.", path.display());
        },
        AuthCommand::Logout => {
            let path = config::persist_token(None)?;
            println!("Signed out. Token removed from {}.", path.display());
        },
        AuthCommand::Status => {
            if config.hub_token.is_none() {
                println!("Not signed in.");
                return Ok(());
            }
            let user = client.current_user().await?;
            println!("Signed in as {} (id {}).", user.username, user.id);
        },
    }
    Ok(())
}

fn prompt_token() -> Result<String> {
    print!("Paste your access token: ");
    io::stdout().flush()?;
    let mut token = String::new();
    io::stdin()
        .read_line(&mut token)
        .context("Could not read token from stdin")?;
    Ok(token.trim().to_string())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_items(kind: ItemKind, items: &[CatalogItem]) -> String {
    let label = |item: &CatalogItem| format!("{}@{}", item.name, item.version);
    let name_width = items.iter().map(|item| label(item).len()).max().unwrap_or(0);
    let categories = items
        .iter()
        .map(|item| resolve_category(kind, item))
        .collect::<Vec<_>>();
    let category_width = categories.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for (item, category) in items.iter().zip(&categories) {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<category_width$}  {:>4.1}  {:>6}  {}",
            label(item),
            category,
            item.rating,
            item.download_count,
            shortened_description(&item.description),
        );
    }
    out
}

fn render_footer(kind: ItemKind, page: &Page<CatalogItem>) -> String {
    let pages = page.total.div_ceil(u64::from(page.page_size)).max(1);
    let mut footer = format!(
        "Page {} of {pages}, {} {} total.",
        page.page,
        page.total,
        kind.plural()
    );
    if page.has_more {
        let _ = write!(footer, " Pass --page {} for more.", page.page + 1);
    }
    footer
}

fn shortened_description(description: &str) -> String {
    let description = description.split_whitespace().collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return DEFAULT_DESCRIPTION.to_string();
    }
    if description.chars().count() <= DESCRIPTION_WIDTH {
        return description;
    }
    let truncated = description
        .chars()
        .take(DESCRIPTION_WIDTH)
        .collect::<String>();
    format!("{}...", truncated.trim_end())
}

/// Same cleanup the service applies to archive file names: runs of
/// characters outside `[a-zA-Z0-9._-]` become a single dash, leading and
/// trailing dashes and dots are stripped.
fn sanitize_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut last_was_dash = false;
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            cleaned.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            cleaned.push('-');
            last_was_dash = true;
        }
    }
    let cleaned = cleaned.trim_matches(|c| c == '-' || c == '.');
    if cleaned.is_empty() {
        "item".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rastion_catalog::User;

    use super::*;

    fn item(name: &str, version: &str, description: &str, category: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: 1,
            name: name.to_string(),
            version: version.to_string(),
            description: description.to_string(),
            category: category.map(str::to_string),
            download_count: 12,
            rating: 4.5,
            owner: User {
                id: 1,
                username: "ada".to_string(),
                avatar_url: String::new(),
            },
        }
    }

    #[test]
    fn items_render_as_aligned_columns() {
        let items = vec![
            item("tabu-search", "1.0.0", "qubo warm starts", None),
            item("or", "0.2.1", "", Some("MILP")),
        ];
        let rendered = render_items(ItemKind::Solver, &items);
        assert_eq!(
            rendered,
            "tabu-search@1.0.0  QUBO   4.5      12  qubo warm starts\n\
             or@0.2.1           MILP   4.5      12  <no description provided>\n"
        );
    }

    #[test]
    fn footer_mentions_the_next_page_only_when_there_is_one() {
        let page = Page {
            items: vec![],
            total: 41,
            page: 2,
            page_size: 20,
            has_more: true,
        };
        assert_eq!(
            render_footer(ItemKind::Solver, &page),
            "Page 2 of 3, 41 solvers total. Pass --page 3 for more."
        );

        let last = Page { page: 3, has_more: false, ..page };
        assert_eq!(
            render_footer(ItemKind::Solver, &last),
            "Page 3 of 3, 41 solvers total."
        );
    }

    #[test]
    fn long_descriptions_are_shortened() {
        let long = "words ".repeat(30);
        let shortened = shortened_description(&long);
        assert!(shortened.ends_with("..."));
        assert!(shortened.chars().count() <= DESCRIPTION_WIDTH + 3);
    }

    #[test]
    fn sanitize_name_mirrors_the_service() {
        assert_eq!(sanitize_name("Knapsack Pro!"), "Knapsack-Pro");
        assert_eq!(sanitize_name("  ..weird  name..  "), "weird-name");
        assert_eq!(sanitize_name("???"), "item");
        assert_eq!(sanitize_name("v1.2.3"), "v1.2.3");
    }
}
