//! Node and edge table export.
//!
//! A finished graph is flattened into two row sets and written as CSV with a
//! header row:
//!
//! - `{output_dir}/{category}/nodelist-{category}-{year}.csv`:
//!   `id,bipartite,title,summary,publish_date` (paper-only columns are empty for authors)
//! - `{output_dir}/{category}/edgelist-{category}-{year}.csv`: `node1,node2`

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ExportResult;
use crate::graph::{BipartiteGraph, NodeData};

/// One row of the node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow<'a> {
    /// Node key.
    pub id: &'a str,
    /// `paper` or `author`.
    pub bipartite: &'static str,
    /// Paper title.
    pub title: Option<&'a str>,
    /// Paper abstract.
    pub summary: Option<&'a str>,
    /// RFC 3339 publication timestamp.
    pub publish_date: Option<String>,
}

impl NodeRow<'_> {
    /// Column names, in output order.
    pub const HEADER: [&'static str; 5] = ["id", "bipartite", "title", "summary", "publish_date"];
}

/// One row of the edge table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRow<'a> {
    /// Author key.
    pub node1: &'a str,
    /// Paper identifier.
    pub node2: &'a str,
}

impl EdgeRow<'_> {
    /// Column names, in output order.
    pub const HEADER: [&'static str; 2] = ["node1", "node2"];
}

/// Node rows in graph iteration order.
#[must_use]
pub fn node_rows(graph: &BipartiteGraph) -> Vec<NodeRow<'_>> {
    graph
        .nodes()
        .map(|node| match &node.data {
            NodeData::Paper { title, summary, publish_date } => NodeRow {
                id: &node.key,
                bipartite: node.data.partition().as_str(),
                title: Some(title.as_str()),
                summary: Some(summary.as_str()),
                publish_date: publish_date.as_ref().map(|d| d.to_rfc3339()),
            },
            NodeData::Author => NodeRow {
                id: &node.key,
                bipartite: node.data.partition().as_str(),
                title: None,
                summary: None,
                publish_date: None,
            },
        })
        .collect()
}

/// Edge rows in graph iteration order.
#[must_use]
pub fn edge_rows(graph: &BipartiteGraph) -> Vec<EdgeRow<'_>> {
    graph.edges().map(|(node1, node2)| EdgeRow { node1, node2 }).collect()
}

/// Write `rows` as CSV under `header`.
///
/// The header is always written, so an empty row set still yields a valid table.
pub fn write_rows<W, R>(writer: W, header: &[&str], rows: &[R]) -> ExportResult<()>
where
    W: io::Write,
    R: Serialize,
{
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Locations of one year's tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPaths {
    /// Node table.
    pub nodes: PathBuf,
    /// Edge table.
    pub edges: PathBuf,
}

/// Writes year graphs beneath an output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    /// Create an exporter rooted at `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    /// Root output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the tables for `category` and `year` go.
    #[must_use]
    pub fn paths(&self, category: &str, year: i32) -> ExportPaths {
        let dir = self.output_dir.join(category);
        ExportPaths {
            nodes: dir.join(format!("nodelist-{category}-{year}.csv")),
            edges: dir.join(format!("edgelist-{category}-{year}.csv")),
        }
    }

    /// Write both tables, creating the category directory if needed.
    pub fn export(
        &self,
        graph: &BipartiteGraph,
        category: &str,
        year: i32,
    ) -> ExportResult<ExportPaths> {
        let paths = self.paths(category, year);
        std::fs::create_dir_all(self.output_dir.join(category))?;

        let nodes = node_rows(graph);
        write_rows(std::fs::File::create(&paths.nodes)?, &NodeRow::HEADER, &nodes)?;

        let edges = edge_rows(graph);
        write_rows(std::fs::File::create(&paths.edges)?, &EdgeRow::HEADER, &edges)?;

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            node_table = %paths.nodes.display(),
            edge_table = %paths.edges.display(),
            "Wrote graph tables"
        );

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn sample_graph() -> BipartiteGraph {
        let mut g = BipartiteGraph::new();
        let published = DateTime::parse_from_rfc3339("2019-01-01T18:59:41Z").ok();
        g.add_paper("1901.00001", "Graphs, again".into(), "Line one\nline two".into(), published);
        g.add_author("Jane Q Doe");
        g.link("Jane Q Doe", "1901.00001");
        g
    }

    fn render<R: Serialize>(header: &[&str], rows: &[R]) -> String {
        let mut buf = Vec::new();
        write_rows(&mut buf, header, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_node_rows() {
        let g = sample_graph();
        let rows = node_rows(&g);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "1901.00001");
        assert_eq!(rows[0].bipartite, "paper");
        assert_eq!(rows[0].publish_date.as_deref(), Some("2019-01-01T18:59:41+00:00"));
        let author = NodeRow {
            id: "Jane Q Doe",
            bipartite: "author",
            title: None,
            summary: None,
            publish_date: None,
        };
        assert_eq!(rows[1], author);
    }

    #[test]
    fn test_edge_rows_put_author_first() {
        let g = sample_graph();
        assert_eq!(edge_rows(&g), vec![EdgeRow { node1: "Jane Q Doe", node2: "1901.00001" }]);
    }

    #[test]
    fn test_node_csv_quotes_and_blanks() {
        let g = sample_graph();
        let csv = render(&NodeRow::HEADER, &node_rows(&g));

        assert_eq!(
            csv,
            "id,bipartite,title,summary,publish_date\n\
             1901.00001,paper,\"Graphs, again\",\"Line one\nline two\",2019-01-01T18:59:41+00:00\n\
             Jane Q Doe,author,,,\n"
        );
    }

    #[test]
    fn test_empty_tables_keep_header() {
        let g = BipartiteGraph::new();
        assert_eq!(
            render(&NodeRow::HEADER, &node_rows(&g)),
            "id,bipartite,title,summary,publish_date\n"
        );
        assert_eq!(render(&EdgeRow::HEADER, &edge_rows(&g)), "node1,node2\n");
    }

    #[test]
    fn test_paths_follow_category_layout() {
        let exporter = Exporter::new("datasets");
        let paths = exporter.paths("cs.DL", 2019);
        assert_eq!(paths.nodes, PathBuf::from("datasets/cs.DL/nodelist-cs.DL-2019.csv"));
        assert_eq!(paths.edges, PathBuf::from("datasets/cs.DL/edgelist-cs.DL-2019.csv"));
    }
}
