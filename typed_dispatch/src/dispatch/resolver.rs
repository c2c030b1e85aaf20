//! Resolver: walks the dispatch table for one tuple of argument types.
//!
//! The walk is a depth-first matching automaton with state
//! `(node, argument index, accumulated conversions)`. At each node an argument
//! either matches an edge directly (same type, registered subtype or `any`) or
//! through the cheapest conversion path into the edge's type set. Every
//! accepting path becomes a candidate; the best candidate is chosen by rank.
//!
//! Rank, compared lexicographically (lower is better):
//! 1. total conversion cost
//! 2. number of converted arguments
//! 3. fixed-arity before variadic
//! 4. per-position `(subtype distance, union width)`, left to right
//! 5. declaration order
//!
//! Candidates equal on 1-4 are ties; the caller decides whether a tie is an
//! error or resolved by declaration order.

use std::borrow::Cow;
use std::cmp::Ordering;

use super::table::{DispatchTable, Node};
use crate::conversion::{ConversionGraph, ConversionPath};
use crate::error::{Mismatch, Result};
use crate::signature::{Param, ParsedSignature};
use crate::types::{TypeRegistry, ANY_DISTANCE};
use crate::value::Value;

/// Position distance recorded for a converted argument, worse than any direct match.
const CONVERTED_DISTANCE: u32 = ANY_DISTANCE + 1;

/// Everything the resolver reads besides the table itself.
pub(crate) struct ResolveContext<'a> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) conversions: &'a ConversionGraph,
    pub(crate) max_hops: usize,
}

/// A resolved signature plus the conversions to apply to the arguments.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub(crate) entry: usize,
    pub(crate) conversions: Vec<Option<ConversionPath>>,
}

impl Resolution {
    /// Declaration index of the selected signature.
    pub fn entry_index(&self) -> usize {
        self.entry
    }

    pub fn is_direct(&self) -> bool {
        self.conversions.iter().all(Option::is_none)
    }

    /// `(argument index, path)` for every argument that needs converting.
    pub fn conversions(&self) -> impl Iterator<Item = (usize, &ConversionPath)> {
        self.conversions
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|path| (i, path)))
    }

    /// Total cost of all conversions.
    pub fn cost(&self) -> u32 {
        self.conversions().map(|(_, p)| p.cost()).sum()
    }

    /// Arguments after conversion; borrows when nothing needs converting.
    pub(crate) fn apply<'v>(&self, args: &'v [Value]) -> Result<Cow<'v, [Value]>> {
        if self.is_direct() {
            return Ok(Cow::Borrowed(args));
        }
        args.iter()
            .zip(&self.conversions)
            .map(|(value, conversion)| match conversion {
                Some(path) => path.apply(value),
                None => Ok(value.clone()),
            })
            .collect::<Result<Vec<_>>>()
            .map(Cow::Owned)
    }
}

/// Result of a successful walk.
#[derive(Debug)]
pub(crate) struct Selection {
    pub(crate) resolution: Resolution,
    /// Other entries with the same rank as the selected one.
    pub(crate) tied: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    cost: u32,
    converted: usize,
    uses_rest: bool,
    positions: Vec<(u32, usize)>,
}

struct Matched {
    distance: u32,
    conversion: Option<ConversionPath>,
}

struct Walk<'c, 'a> {
    ctx: &'c ResolveContext<'c>,
    arg_types: &'a [&'a str],
    cost: u32,
    positions: Vec<(u32, usize)>,
    conversions: Vec<Option<ConversionPath>>,
    best: Option<(Rank, Resolution)>,
    tied: Vec<usize>,
}

pub(crate) fn match_arg(
    ctx: &ResolveContext<'_>,
    param: &Param,
    actual: &str,
) -> Option<(u32, Option<ConversionPath>)> {
    let direct = param
        .types
        .iter()
        .filter_map(|t| ctx.registry.subtype_distance(actual, t))
        .min();
    if let Some(distance) = direct {
        return Some((distance, None));
    }
    ctx.conversions
        .find_conversions(&param.types, actual, ctx.registry, ctx.max_hops)
        .into_iter()
        .next()
        .map(|path| (CONVERTED_DISTANCE, Some(path)))
}

impl<'c, 'a> Walk<'c, 'a> {
    fn matches(&self, param: &Param, actual: &str) -> Option<Matched> {
        match_arg(self.ctx, param, actual).map(|(distance, conversion)| Matched {
            distance,
            conversion,
        })
    }

    fn push(&mut self, param: &Param, matched: Matched) {
        if let Some(path) = &matched.conversion {
            self.cost = self.cost.saturating_add(path.cost());
        }
        self.positions.push((matched.distance, param.width()));
        self.conversions.push(matched.conversion);
    }

    fn pop(&mut self) {
        self.positions.pop();
        if let Some(Some(path)) = self.conversions.pop() {
            self.cost -= path.cost();
        }
    }

    fn pruned(&self) -> bool {
        self.best
            .as_ref()
            .is_some_and(|(rank, _)| self.cost > rank.cost)
    }

    fn accept(&mut self, entry: usize, uses_rest: bool) {
        let rank = Rank {
            cost: self.cost,
            converted: self.conversions.iter().filter(|c| c.is_some()).count(),
            uses_rest,
            positions: self.positions.clone(),
        };
        let resolution = Resolution {
            entry,
            conversions: self.conversions.clone(),
        };
        let standing = self
            .best
            .as_ref()
            .map(|(best_rank, best)| (rank.cmp(best_rank), best.entry));
        match standing {
            None => self.best = Some((rank, resolution)),
            Some((Ordering::Less, _)) => {
                self.best = Some((rank, resolution));
                self.tied.clear();
            }
            Some((Ordering::Equal, best_entry)) if entry < best_entry => {
                self.tied.push(best_entry);
                self.best = Some((rank, resolution));
            }
            Some((Ordering::Equal, _)) => self.tied.push(entry),
            Some((Ordering::Greater, _)) => {}
        }
    }

    fn walk(&mut self, node: &Node, index: usize) {
        let arg_types = self.arg_types;
        let n = arg_types.len();
        if index == n {
            for &leaf in &node.leaves {
                self.accept(leaf, false);
            }
        }

        for rest in &node.rest {
            let mut consumed = 0;
            for &actual in &arg_types[index..] {
                match self.matches(&rest.param, actual) {
                    Some(matched) => {
                        self.push(&rest.param, matched);
                        consumed += 1;
                    }
                    None => break,
                }
            }
            if index + consumed == n && !self.pruned() {
                self.accept(rest.leaf, true);
            }
            for _ in 0..consumed {
                self.pop();
            }
        }

        if index < n {
            let actual = arg_types[index];
            for edge in &node.edges {
                let Some(matched) = self.matches(&edge.param, actual) else {
                    continue;
                };
                self.push(&edge.param, matched);
                if !self.pruned() {
                    self.walk(&edge.child, index + 1);
                }
                self.pop();
            }
        }
    }
}

/// Find the best signature for `arg_types`, or `None` when nothing matches.
pub(crate) fn resolve(
    table: &DispatchTable,
    arg_types: &[&str],
    ctx: &ResolveContext<'_>,
) -> Option<Selection> {
    let mut walk = Walk {
        ctx,
        arg_types,
        cost: 0,
        positions: Vec::with_capacity(arg_types.len()),
        conversions: Vec::with_capacity(arg_types.len()),
        best: None,
        tied: Vec::new(),
    };
    walk.walk(&table.root, 0);
    let (_, resolution) = walk.best?;
    let mut tied = walk.tied;
    tied.retain(|&entry| entry != resolution.entry);
    tied.sort_unstable();
    tied.dedup();
    Some(Selection { resolution, tied })
}

enum Failure {
    UnexpectedType(usize, Vec<String>),
    TooFew(usize, Vec<String>),
    TooMany(usize),
}

impl Failure {
    fn progress(&self) -> usize {
        match self {
            Failure::UnexpectedType(index, _) | Failure::TooFew(index, _) => *index,
            Failure::TooMany(max) => *max,
        }
    }
}

fn first_failure(
    signature: &ParsedSignature,
    arg_types: &[&str],
    ctx: &ResolveContext<'_>,
) -> Option<Failure> {
    for (index, actual) in arg_types.iter().enumerate() {
        let param = match signature.params.get(index) {
            Some(p) => p,
            None => match signature.rest_param() {
                Some(rest) => rest,
                None => return Some(Failure::TooMany(signature.params.len())),
            },
        };
        if match_arg(ctx, param, actual).is_none() {
            return Some(Failure::UnexpectedType(index, param.types.clone()));
        }
    }
    let n = arg_types.len();
    if n < signature.min_arity() {
        return Some(Failure::TooFew(n, signature.params[n].types.clone()));
    }
    None
}

fn merge_expected(into: &mut Vec<String>, types: &[String]) {
    for t in types {
        if !into.contains(t) {
            into.push(t.clone());
        }
    }
}

/// Explain why no signature accepted `arg_types`: the failure that got
/// furthest through the argument list, with expected types merged across
/// all signatures failing at that position.
pub(crate) fn diagnose(
    signatures: &[&ParsedSignature],
    arg_types: &[&str],
    ctx: &ResolveContext<'_>,
) -> Mismatch {
    let failures: Vec<Failure> = signatures
        .iter()
        .filter_map(|s| first_failure(s, arg_types, ctx))
        .collect();
    let Some(furthest) = failures.iter().map(Failure::progress).max() else {
        return Mismatch::TooManyArguments {
            max: 0,
            actual: arg_types.len(),
        };
    };
    let at_furthest: Vec<&Failure> = failures
        .iter()
        .filter(|f| f.progress() == furthest)
        .collect();

    let mut expected = Vec::new();
    for failure in &at_furthest {
        if let Failure::UnexpectedType(_, types) = failure {
            merge_expected(&mut expected, types);
        }
    }
    if !expected.is_empty() {
        return Mismatch::UnexpectedType {
            index: furthest,
            expected,
            actual: arg_types[furthest].to_string(),
        };
    }
    for failure in &at_furthest {
        if let Failure::TooFew(_, types) = failure {
            merge_expected(&mut expected, types);
        }
    }
    if !expected.is_empty() {
        return Mismatch::TooFewArguments {
            index: furthest,
            expected,
        };
    }
    Mismatch::TooManyArguments {
        max: furthest,
        actual: arg_types.len(),
    }
}
