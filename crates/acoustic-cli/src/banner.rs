use std::path::Path;

use acoustic_db::MigrationLedger;
use anyhow::Result;

fn display_path(path: &Path) -> String {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => path.to_string_lossy().replace(&home, "~"),
        _ => path.to_string_lossy().to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    format!("{n} {word}{}", if n == 1 { "" } else { "s" })
}

/// Lines of the ledger summary box, without printing.
fn ledger_banner(
    db_path: &Path,
    migrations_dir: &Path,
    applied: usize,
    pending: usize,
    latest: Option<&str>,
) -> Vec<String> {
    let version = env!("CARGO_PKG_VERSION");

    let width = 70;
    let left_w = 20;
    let right_w = width - left_w - 6; // 6 for "│ ", "│  " and "│"

    let title = format!("Acoustic v{version}");
    let title_dashes = width - 2 - title.len() - 5; // 2 for ╭╮, 5 for "─── " + " "
    let top = format!("╭─── {title} {}╮", "─".repeat(title_dashes));
    let bottom = format!("╰{}╯", "─".repeat(width - 2));

    let fit = |s: String| -> String {
        if s.chars().count() > right_w {
            let tail: String = s.chars().rev().take(right_w - 1).collect();
            format!("…{}", tail.chars().rev().collect::<String>())
        } else {
            s
        }
    };
    let row = |l: &str, r: String| format!("│ {:<left_w$}│  {:<right_w$}│", l, fit(r));

    vec![
        top,
        row("", String::new()),
        row("  Database", display_path(db_path)),
        row("  Migrations", display_path(migrations_dir)),
        row("", "─".repeat(right_w - 2)),
        row("  Applied", plural(applied, "migration")),
        row("  Pending", plural(pending, "migration")),
        row("  Latest", latest.unwrap_or("none").to_string()),
        row("", String::new()),
        bottom,
    ]
}

/// Print the ledger summary box for `init` and `migrate status`.
pub fn print_ledger_banner(ledger: &MigrationLedger) -> Result<()> {
    let applied = ledger.applied()?;
    let pending = ledger.pending()?;
    let latest = applied.last().map(|e| format!("{} {}", e.version, e.name));

    for line in ledger_banner(
        ledger.db_path(),
        ledger.migrations_dir(),
        applied.len(),
        pending.len(),
        latest.as_deref(),
    ) {
        println!("{line}");
    }
    Ok(())
}
