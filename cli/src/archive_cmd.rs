use crate::cli::DeleteArgs;
use crate::cli::ListArgs;
use crate::cli::SearchArgs;
use crate::cli::ShowArgs;
use crate::format::format_size;
use crate::format::format_timestamp;
use crate::format::status_label;
use dossier_client::Client;
use dossier_protocol::envelope::Page;
use dossier_protocol::records::CaseFileQuery;
use dossier_protocol::records::SearchQuery;
use std::io::Write;

pub async fn tasks(client: &Client, json: bool) -> anyhow::Result<()> {
    let tasks = client.list_import_tasks().await?;
    if json {
        for task in &tasks {
            println!("{}", serde_json::to_string(task)?);
        }
        return Ok(());
    }
    if tasks.is_empty() {
        println!("No import batches recorded.");
        return Ok(());
    }
    println!(
        "{:<6} {:<24} {:>6} {:>6} {:>6}  {:<10} {}",
        "ID", "NAME", "TOTAL", "OK", "FAIL", "STATUS", "UPDATED"
    );
    for task in &tasks {
        println!(
            "{:<6} {:<24} {:>6} {:>6} {:>6}  {:<10} {}",
            task.id,
            task.task_name.as_deref().unwrap_or("-"),
            task.total_files,
            task.success_files,
            task.failed_files,
            status_label(task.status),
            task.updated_at
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    Ok(())
}

pub async fn list(client: &Client, args: ListArgs, json: bool) -> anyhow::Result<()> {
    let query = CaseFileQuery {
        keyword: args.keyword,
        case_type: args.case_type,
        status: args.status,
        page: Some(args.page),
        page_size: Some(args.page_size),
    };
    let listing = client.list_case_files(&query).await?;
    if json {
        for item in &listing.items {
            println!("{}", serde_json::to_string(item)?);
        }
        return Ok(());
    }
    if listing.items.is_empty() {
        println!("No case files matched.");
        return Ok(());
    }
    println!(
        "{:<6} {:<16} {:<36} {:<12} {:>10}  {}",
        "ID", "CASE NO", "TITLE", "TYPE", "SIZE", "UPDATED"
    );
    for item in &listing.items {
        println!(
            "{:<6} {:<16} {:<36} {:<12} {:>10}  {}",
            item.id,
            item.case_no.as_deref().unwrap_or("-"),
            item.title
                .as_deref()
                .or(item.case_name.as_deref())
                .unwrap_or("(untitled)"),
            item.case_type.as_deref().unwrap_or("-"),
            item.file_size
                .map(format_size)
                .unwrap_or_else(|| "-".to_string()),
            item.updated_at
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    print_page_line(listing.page);
    Ok(())
}

pub async fn search(client: &Client, args: SearchArgs, json: bool) -> anyhow::Result<()> {
    let query = SearchQuery {
        keyword: args.keyword,
        search_mode: args.mode,
        search_scope: args.scope,
        sort_by: args.sort_by,
        case_type: args.case_type,
        department: args.department,
        page: Some(args.page),
        page_size: Some(args.page_size),
    };
    let results = client.search_case_files(&query).await?;
    if json {
        for hit in &results.hits {
            println!("{}", serde_json::to_string(hit)?);
        }
        return Ok(());
    }
    if results.hits.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for hit in &results.hits {
        let title = hit
            .title
            .as_deref()
            .or(hit.case_name.as_deref())
            .unwrap_or("(untitled)");
        match hit.relevance_score.as_deref() {
            Some(score) => println!("#{:<5} {title}  [{score}]", hit.id),
            None => println!("#{:<5} {title}", hit.id),
        }
        for fragment in &hit.fragments {
            println!("       {fragment}");
        }
    }
    if let Some(took) = results.meta.took {
        println!();
        println!("{} hit(s) in {took:.0} ms", results.hits.len());
    }
    print_page_line(results.page);
    Ok(())
}

pub async fn show(client: &Client, args: ShowArgs, json: bool) -> anyhow::Result<()> {
    let detail = client.case_file_detail(args.id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }
    let summary = &detail.summary;
    println!("Case file #{}", summary.id);
    print_field("Title", summary.title.as_deref());
    print_field("Case no", summary.case_no.as_deref());
    print_field("Case", summary.case_name.as_deref());
    print_field("Type", summary.case_type.as_deref());
    print_field("Department", summary.source_department.as_deref());
    print_field("Person", summary.person_name.as_deref());
    print_field("Incident", summary.incident_time.as_deref());
    print_field("Status", summary.status.as_deref());
    print_field("Classification", detail.classification.as_deref());
    if let Some(size) = summary.file_size {
        println!("{:<16} {}", "Size", format_size(size));
    }
    if !summary.tags.is_empty() {
        println!("{:<16} {}", "Tags", summary.tags.join(", "));
    }
    if let Some(updated) = &summary.updated_at {
        println!("{:<16} {}", "Updated", format_timestamp(updated));
    }
    if !detail.timeline.is_empty() {
        println!();
        println!("Timeline:");
        for entry in &detail.timeline {
            println!(
                "  {:<12} {}",
                entry.date.as_deref().unwrap_or("-"),
                entry
                    .event
                    .as_deref()
                    .or(entry.description.as_deref())
                    .unwrap_or("-")
            );
        }
    }
    if let Some(ocr) = &detail.ocr_text {
        const PREVIEW_LINES: usize = 12;
        println!();
        println!("Extracted text:");
        for line in ocr.lines().take(PREVIEW_LINES) {
            println!("  {line}");
        }
        let total = ocr.lines().count();
        if total > PREVIEW_LINES {
            println!("  ... ({} more lines)", total - PREVIEW_LINES);
        }
    }
    Ok(())
}

pub async fn delete(client: &Client, args: DeleteArgs) -> anyhow::Result<()> {
    if !args.yes && !confirm_delete(args.id)? {
        println!("Aborted.");
        return Ok(());
    }
    client.delete_case_file(args.id).await?;
    println!("Deleted case file #{}.", args.id);
    Ok(())
}

fn confirm_delete(id: u64) -> anyhow::Result<bool> {
    print!("Delete case file #{id}? Type 'yes' to confirm: ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("yes"))
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{label:<16} {value}");
    }
}

fn print_page_line(page: Option<Page>) {
    if let Some(page) = page {
        let pages = if page.page_size == 0 {
            1
        } else {
            page.total.div_ceil(u64::from(page.page_size))
        };
        println!();
        println!("Page {}/{pages} ({} total)", page.page, page.total);
    }
}
