use autozip_core::{AppViewModel, BannerKind, PathSource, ShutdownPhase, StatusClass};
use colored::Colorize;

const BAR_WIDTH: usize = 30;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.closed_notice {
        lines.push(autozip_core::CLOSED_NOTICE.yellow().bold().to_string());
        return lines;
    }

    lines.push(path_line(view));

    if view.packing || view.progress > 0 {
        lines.push(progress_bar(view.progress));
    }

    let status = format!("Status: {}", view.status_text);
    lines.push(match view.status_class {
        StatusClass::Normal => status,
        StatusClass::Packing => status.cyan().to_string(),
        StatusClass::Error => status.red().to_string(),
    });

    if let Some(banner) = &view.banner {
        lines.push(match banner.kind {
            BannerKind::Success => format!("+ {}", banner.text).green().bold().to_string(),
            BannerKind::Error => format!("! {}", banner.text).red().bold().to_string(),
        });
    }

    if view.shutdown == ShutdownPhase::Running {
        lines.push(command_hint(view.pack_enabled));
    }
    lines
}

fn path_line(view: &AppViewModel) -> String {
    if view.path.is_empty() {
        let hint = view
            .placeholder
            .as_deref()
            .unwrap_or("none chosen, type 'browse' or 'path <folder>'");
        return format!("Output path: {}", hint.dimmed());
    }
    let origin = match view.path_source {
        Some(PathSource::Picker) => " (picked)",
        Some(PathSource::Manual) => " (entered)",
        None => "",
    };
    format!("Output path: {}{}", view.path.bold(), origin.dimmed())
}

pub fn progress_bar(progress: u8) -> String {
    let percent = usize::from(progress.min(100));
    let filled = percent * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn command_hint(pack_enabled: bool) -> String {
    let pack = if pack_enabled {
        "pack".bold().to_string()
    } else {
        "pack".dimmed().to_string()
    };
    format!("Commands: browse | path <folder> | {pack} | shutdown | help | quit")
}
