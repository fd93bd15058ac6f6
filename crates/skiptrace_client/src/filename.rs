#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    /// The CSV generated by the server.
    ServerResults,
    /// CSV regenerated locally from the rows on screen.
    FilteredExport,
}

/// `skip_trace_results_<date>.csv` or `filtered_results_<date>.csv`.
pub fn download_filename(kind: DownloadKind, iso_date: &str) -> String {
    let prefix = match kind {
        DownloadKind::ServerResults => "skip_trace_results",
        DownloadKind::FilteredExport => "filtered_results",
    };
    let date: String = iso_date
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{prefix}_{date}.csv")
}
