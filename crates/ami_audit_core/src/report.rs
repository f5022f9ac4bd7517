use crate::classify::StaleItem;

/// Column header shared by both report sections.
pub const REPORT_HEADER: [&str; 5] = ["Name", "ID", "Date", "Time(UTC)", "Region"];

/// Renders the downloadable report: a header row, an `AMIs` section with one
/// row per stale image (only when any exist), and a `Snapshots` section that
/// is written even when it has no rows.
pub fn render_report(stale_images: &[StaleItem], stale_snapshots: &[StaleItem]) -> String {
    let mut document = csv_rows(std::iter::once(
        REPORT_HEADER.iter().map(|column| column.to_string()).collect(),
    ));

    if !stale_images.is_empty() {
        document.push_str("\nAMIs\n");
        document.push_str(&item_rows(stale_images));
    }

    document.push_str("\nSnapshots\n");
    document.push_str(&item_rows(stale_snapshots));

    document
}

fn item_rows(items: &[StaleItem]) -> String {
    csv_rows(items.iter().map(|item| {
        vec![
            item.name.clone(),
            item.id.clone(),
            item.date.clone(),
            item.time.clone(),
            item.region.clone(),
        ]
    }))
}

fn csv_rows(rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(&row)
            .expect("csv row should serialize into memory");
    }
    let bytes = writer
        .into_inner()
        .expect("in-memory csv buffer should flush");
    String::from_utf8(bytes).expect("csv output should be utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, id: &str, date: &str, time: &str, region: &str) -> StaleItem {
        StaleItem {
            name: name.to_string(),
            id: id.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            region: region.to_string(),
        }
    }

    #[test]
    fn renders_both_sections_with_rows() {
        let report = render_report(
            &[item("app-image", "ami-1", "2024-02-20", "08:30:00", "eu-west-1")],
            &[item("db-snap", "snap-1", "2024-02-19", "23:59:59", "us-east-1")],
        );

        assert_eq!(
            report,
            "Name,ID,Date,Time(UTC),Region\n\
             \nAMIs\napp-image,ami-1,2024-02-20,08:30:00,eu-west-1\n\
             \nSnapshots\ndb-snap,snap-1,2024-02-19,23:59:59,us-east-1\n"
        );
    }

    #[test]
    fn omits_ami_section_without_stale_images() {
        let report = render_report(
            &[],
            &[item("db-snap", "snap-1", "2024-02-19", "23:59:59", "us-east-1")],
        );

        assert!(!report.contains("\nAMIs\n"));
        assert!(report.contains("\nSnapshots\n"));
    }

    #[test]
    fn snapshot_section_header_written_even_when_empty() {
        let report = render_report(&[], &[]);

        assert_eq!(report, "Name,ID,Date,Time(UTC),Region\n\nSnapshots\n");
    }

    #[test]
    fn row_counts_match_stale_counts() {
        let images: Vec<StaleItem> = (0..3)
            .map(|i| {
                item(
                    &format!("image-{i}"),
                    &format!("ami-{i}"),
                    "2024-02-20",
                    "08:30:00",
                    "eu-west-1",
                )
            })
            .collect();
        let snapshots: Vec<StaleItem> = (0..2)
            .map(|i| {
                item(
                    &format!("snap-{i}"),
                    &format!("snap-id-{i}"),
                    "2024-02-19",
                    "23:59:59",
                    "us-east-1",
                )
            })
            .collect();

        let report = render_report(&images, &snapshots);

        let image_rows = report.lines().filter(|line| line.starts_with("image-")).count();
        let snapshot_rows = report.lines().filter(|line| line.starts_with("snap-")).count();
        assert_eq!(image_rows, 3);
        assert_eq!(snapshot_rows, 2);
    }

    #[test]
    fn fields_containing_commas_are_quoted() {
        let report = render_report(
            &[item("app, blue", "ami-1", "2024-02-20", "08:30:00", "eu-west-1")],
            &[],
        );

        assert!(report.contains("\"app, blue\",ami-1"));
    }
}
