use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print `rows` as left-aligned columns under `headers`. Cells wider than
/// [`MAX_CELL`] are truncated.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    for line in render_table(headers, rows) {
        println!("{line}");
    }
}

const MAX_CELL: usize = 60;

fn clip(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL {
        return cell.to_string();
    }
    let mut out: String = cell.chars().take(MAX_CELL - 1).collect();
    out.push('…');
    out
}

fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> Vec<String> {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.iter().map(|c| clip(c)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let pad = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pad(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(pad(widths.iter().map(|&w| "-".repeat(w)).collect()));
    for row in rows {
        lines.push(pad(row));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let lines = render_table(
            &["PASS", "CARD"],
            vec![
                vec!["reorder".into(), "a".into()],
                vec!["archive".into(), "longer name".into()],
            ],
        );
        assert_eq!(lines[0], "PASS     CARD");
        assert_eq!(lines[1], "-------  -----------");
        assert_eq!(lines[2], "reorder  a");
        assert_eq!(lines[3], "archive  longer name");
    }

    #[test]
    fn long_cells_are_clipped() {
        let long = "x".repeat(100);
        let lines = render_table(&["CARD"], vec![vec![long]]);
        assert_eq!(lines[2].chars().count(), MAX_CELL);
        assert!(lines[2].ends_with('…'));
    }
}
