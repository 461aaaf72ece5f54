//! Rendering of the missing-handler report.

use console::style;
use indexmap::IndexMap;

use crate::lint::missing::MissingHandler;

/// Print the report grouped by service, in map insertion order.
pub fn display_results(missing_handlers: &[MissingHandler]) {
    let mut service_groups: IndexMap<&str, Vec<&MissingHandler>> = IndexMap::new();
    for handler in missing_handlers {
        service_groups
            .entry(handler.service.name.as_str())
            .or_default()
            .push(handler);
    }

    if service_groups.is_empty() {
        println!("{}", style("✔ No missing handlers found").green());
        return;
    }

    for handlers in service_groups.values() {
        let service = &handlers[0].service;
        println!(
            "{}{}",
            style(&service.name).underlined(),
            style(format!(" ({})", service.path.display())).dim()
        );
        for (handler_index, handler) in handlers.iter().enumerate() {
            let is_last_handler = handler_index == handlers.len() - 1;
            let trunk = if is_last_handler { " " } else { "│" };
            println!(
                "  {} {} {}",
                if is_last_handler { "└─" } else { "├─" },
                style(&handler.service.to_handle_http_method).cyan(),
                style(&handler.service.to_handle_url).yellow()
            );
            println!("  {trunk}  ├─ {}", style("Used in:").dim());
            for (file_index, file) in handler.used_in.iter().enumerate() {
                let branch = if file_index == handler.used_in.len() - 1 {
                    "│   └─"
                } else {
                    "│   ├─"
                };
                println!("  {trunk}  {branch} {file}");
            }
            println!("  {trunk}  └─ {}", style("Suggested handler:").green());
            println!(
                "  {trunk}      {} {}",
                style("→").dim(),
                handler.suggested_path.display()
            );
            if !is_last_handler {
                println!("  {trunk}");
            }
        }
        println!();
    }

    let noun = if missing_handlers.len() == 1 {
        "handler"
    } else {
        "handlers"
    };
    println!(
        "{}",
        style(format!("✘ {} missing {noun}", missing_handlers.len())).red()
    );
}
