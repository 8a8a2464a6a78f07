//! Per-aggregate checks, level by level.

use cl_02_page_ledger::Page;
use cl_03_hierarchical_aggregation::{Aggregate, Level};
use shared_types::{short_hex, Hash, ZERO_HASH};

use crate::domain::report::IntegrityReport;
use crate::domain::violation::{Violation, ViolationKind};

/// What an aggregate expects to find for one child.
struct ChildRef {
    first_page: u64,
    last_page: u64,
    digest: Hash,
}

/// Check every level, restricted to aggregates accepted by `include`.
pub(super) fn check_all(
    levels: &[Vec<Aggregate>; 4],
    pages: &[Page],
    include: impl Fn(&Aggregate) -> bool,
    report: &mut IntegrityReport,
) {
    for level in Level::ALL {
        let children: Vec<ChildRef> = match level.child_level() {
            None => pages
                .iter()
                .map(|p| ChildRef {
                    first_page: p.sequence_index,
                    last_page: p.sequence_index,
                    digest: p.page_hash,
                })
                .collect(),
            Some(child) => levels[child.index()]
                .iter()
                .map(|a| ChildRef {
                    first_page: a.first_page,
                    last_page: a.last_page,
                    digest: a.rollup_hash,
                })
                .collect(),
        };

        let closed = &levels[level.index()];
        for (i, aggregate) in closed.iter().enumerate() {
            if !include(aggregate) {
                continue;
            }
            let prev = i.checked_sub(1).map(|p| &closed[p]);
            if let Some(violation) = check_aggregate(aggregate, i as u64, prev, &children) {
                report.violations.push(violation);
            }
            report.aggregates_checked += 1;
        }
    }
}

fn check_aggregate(
    agg: &Aggregate,
    position: u64,
    prev: Option<&Aggregate>,
    children: &[ChildRef],
) -> Option<Violation> {
    let fail = |kind: ViolationKind, detail: String| {
        Some(Violation::aggregate(agg.level, position, kind, detail))
    };

    if agg.position != position {
        return fail(
            ViolationKind::SequenceMismatch,
            format!("stored position {}", agg.position),
        );
    }

    let recomputed = agg.compute_hash();
    if recomputed != agg.rollup_hash {
        return fail(
            ViolationKind::HashMismatch,
            format!(
                "stored {} but content hashes to {}",
                short_hex(&agg.rollup_hash),
                short_hex(&recomputed)
            ),
        );
    }

    let expected_prior = prev.map_or(ZERO_HASH, |p| p.rollup_hash);
    if agg.prior_rollup_hash != expected_prior {
        return fail(
            ViolationKind::BrokenLink,
            format!(
                "prior_rollup_hash {} but predecessor is {}",
                short_hex(&agg.prior_rollup_hash),
                short_hex(&expected_prior)
            ),
        );
    }

    let expected_first = prev.map_or(0, Aggregate::next_child);
    if agg.first_child != expected_first || agg.child_digests.is_empty() {
        return fail(
            ViolationKind::CoverageMismatch,
            format!(
                "covers {} children from {}, expected to start at {}",
                agg.child_digests.len(),
                agg.first_child,
                expected_first
            ),
        );
    }

    let start = agg.first_child as usize;
    let Some(expected) = start
        .checked_add(agg.child_digests.len())
        .and_then(|end| children.get(start..end))
    else {
        return fail(
            ViolationKind::CoverageMismatch,
            format!(
                "{} children from {} do not exist ({} available)",
                agg.child_digests.len(),
                start,
                children.len()
            ),
        );
    };

    if let Some(offset) = expected
        .iter()
        .zip(&agg.child_digests)
        .position(|(child, digest)| child.digest != *digest)
    {
        return fail(
            ViolationKind::ChildMismatch,
            format!("child {} digest differs from stored child", start + offset),
        );
    }

    let first_page = expected.first().map_or(0, |c| c.first_page);
    let last_page = expected.last().map_or(0, |c| c.last_page);
    if agg.first_page != first_page || agg.last_page != last_page {
        return fail(
            ViolationKind::CoverageMismatch,
            format!(
                "claims pages {}..={} but children cover {}..={}",
                agg.first_page, agg.last_page, first_page, last_page
            ),
        );
    }

    None
}
