use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::simulation_engine::RouterSet;

/// Writes one Graphviz graph per round: routers as boxes, links as dashed
/// undirected edges, and for every installed route an edge from its next
/// hop labelled with the prefix.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    out_dir: PathBuf,
    render_png: bool,
}

impl DotRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        DotRenderer {
            out_dir: out_dir.into(),
            render_png: false,
        }
    }

    /// Also run `dot -Tpng` after writing each graph.
    pub fn with_png(mut self, render_png: bool) -> Self {
        self.render_png = render_png;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn render_round(&self, round: u32, routers: &RouterSet) -> String {
        let mut out = String::new();
        out.push_str("digraph G {\n");
        out.push_str("  graph [rankdir=LR];\n");
        out.push_str("  node [shape=ellipse, style=filled, fillcolor=lightgray];\n");

        for router in routers.iter() {
            let _ = writeln!(out, "  \"{}\" [shape=box, fillcolor=lightblue];", escape(router.id()));
        }

        for (a, b) in routers.links() {
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\" [dir=both, style=dashed, color=gray];",
                escape(&a),
                escape(&b)
            );
        }

        for router in routers.iter() {
            for (prefix, route) in router.routing_table() {
                let prefix_node = format!("p_{}_{}", round, sanitize(prefix));
                let _ = writeln!(
                    out,
                    "  \"{}\" [label=\"{}\", shape=oval, fillcolor=white];",
                    prefix_node,
                    escape(prefix)
                );

                if route.next_hop == router.id() {
                    let _ = writeln!(out, "  \"{}\" -> \"{}\" [color=green];", prefix_node, escape(router.id()));
                } else {
                    let _ = writeln!(
                        out,
                        "  \"{}\" -> \"{}\" [label=\"{}\", color=black];",
                        escape(&route.next_hop),
                        escape(router.id()),
                        escape(prefix)
                    );
                    let _ = writeln!(
                        out,
                        "  \"{}\" -> \"{}\" [style=dotted, color=blue];",
                        prefix_node,
                        escape(router.id())
                    );
                }
            }
        }

        out.push_str("}\n");
        out
    }

    /// Write `round_<n>.dot` and return the most useful output path: the PNG
    /// when it was produced, the DOT file otherwise.
    pub fn write_round(&self, round: u32, routers: &RouterSet) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;

        let dot_path = self.out_dir.join(format!("round_{}.dot", round));
        fs::write(&dot_path, self.render_round(round, routers))?;
        debug!(path = %dot_path.display(), "wrote DOT graph");

        if !self.render_png {
            return Ok(dot_path);
        }

        let png_path = self.out_dir.join(format!("round_{}.png", round));
        match Command::new("dot").arg("-Tpng").arg(&dot_path).arg("-o").arg(&png_path).status() {
            Ok(status) if status.success() => Ok(png_path),
            Ok(status) => {
                warn!(%status, path = %dot_path.display(), "dot exited unsuccessfully, keeping DOT file only");
                Ok(dot_path)
            }
            Err(err) => {
                warn!(error = %err, path = %dot_path.display(), "could not run dot, keeping DOT file only");
                Ok(dot_path)
            }
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn sanitize(prefix: &str) -> String {
    prefix
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
