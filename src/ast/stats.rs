use crate::ast::{
    expression::Expression,
    visit::{self, Visitor},
};

/// Node counts for a (usually rewritten) expression tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total number of expression nodes.
    pub nodes: usize,
    /// Plain `Invoke` nodes.
    pub invocations: usize,
    /// Cache-lookup nodes emitted by the rewriter.
    pub memoized: usize,
    /// Parallel-evaluation nodes emitted by the rewriter.
    pub parallel: usize,
    /// Lambdas, including the outermost one.
    pub lambdas: usize,
    /// Deepest nesting of nodes (a lone constant has depth 1).
    pub max_depth: usize,
}

struct StatsCollector {
    stats: TreeStats,
    depth: usize,
}

impl<'ast> Visitor<'ast> for StatsCollector {
    fn visit_expr(&mut self, expr: &'ast Expression) {
        self.stats.nodes += 1;
        match expr {
            Expression::Invoke { .. } => self.stats.invocations += 1,
            Expression::Memoize { .. } => self.stats.memoized += 1,
            Expression::Parallel { .. } => self.stats.parallel += 1,
            Expression::Lambda { .. } => self.stats.lambdas += 1,
            _ => {}
        }
        self.depth += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.depth);
        visit::walk_expr(self, expr);
        self.depth -= 1;
    }
}

pub fn tree_stats(expr: &Expression) -> TreeStats {
    let mut collector = StatsCollector {
        stats: TreeStats::default(),
        depth: 0,
    };
    collector.visit_expr(expr);
    collector.stats
}
