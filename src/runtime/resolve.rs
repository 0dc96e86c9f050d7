use crate::runtime::registry::{Descriptor, Params};
use crate::runtime::value::{Fit, Value, ValueType};
use smallvec::SmallVec;

/// Outcome of matching one fixed-arity descriptor against the arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Widening,
    Exact,
}

/// Pick the descriptor to invoke for `args`, or `None` when nothing fits.
///
/// A single candidate is always chosen; its arity is checked by the callable itself.
pub(crate) fn select<'r>(candidates: &'r [Descriptor], args: &[Value]) -> Option<&'r Descriptor> {
    match candidates {
        [] => return None,
        [only] => return Some(only),
        _ => {}
    }

    if let Some(d) = best_fixed(candidates, args) {
        return Some(d);
    }
    if let Some(d) = best_variadic(candidates, args) {
        return Some(d);
    }

    let fallback = candidates
        .iter()
        .find(|d| d.arity() == Some(args.len()));
    if let Some(d) = fallback {
        tracing::debug!(
            name = d.name(),
            params = %d.params(),
            "no typed overload matched, falling back on arity"
        );
    }
    fallback
}

fn fixed_tier(tys: &[ValueType], args: &[Value]) -> Option<Tier> {
    if tys.len() != args.len() {
        return None;
    }
    let mut tier = Tier::Exact;
    for (ty, arg) in tys.iter().zip(args) {
        match ty.fit(arg) {
            Fit::Exact => {}
            Fit::Widening => tier = Tier::Widening,
            Fit::None => return None,
        }
    }
    Some(tier)
}

fn best_fixed<'r>(candidates: &'r [Descriptor], args: &[Value]) -> Option<&'r Descriptor> {
    let mut best: Option<(Tier, &Descriptor)> = None;
    for d in candidates {
        let Params::Fixed(tys) = d.params() else {
            continue;
        };
        let Some(tier) = fixed_tier(tys, args) else {
            continue;
        };
        // Strictly better only, so the first registered wins a tie.
        if best.is_none_or(|(t, _)| tier > t) {
            best = Some((tier, d));
        }
    }
    best.map(|(_, d)| d)
}

fn best_variadic<'r>(candidates: &'r [Descriptor], args: &[Value]) -> Option<&'r Descriptor> {
    // (accepts every argument, element rank, descriptor)
    let mut eligible: SmallVec<[(bool, u8, &Descriptor); 4]> = SmallVec::new();
    for d in candidates {
        let Params::Variadic(elem) = d.params() else {
            continue;
        };
        let accepted = args.iter().filter(|a| elem.accepts(a)).count();
        if accepted == 0 {
            continue;
        }
        eligible.push((accepted == args.len(), elem.variadic_rank(), d));
    }

    let (all, rank, d) = eligible
        .iter()
        .copied()
        .min_by_key(|(all, rank, _)| (!*all, *rank))?;
    tracing::debug!(
        name = d.name(),
        params = %d.params(),
        accepts_all = all,
        rank,
        "variadic overload selected"
    );
    Some(d)
}

/// Adapt each argument to the declared parameter type of `desc`.
///
/// Exact fits pass through; widenings and standard conversions are applied. A value with no
/// conversion is passed through raw and left for the callable to reject.
pub(crate) fn adapt(desc: &Descriptor, args: Vec<Value>) -> Vec<Value> {
    let params = desc.params();
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            let Some(ty) = params.type_at(i) else {
                return arg;
            };
            match ty.fit(&arg) {
                Fit::Exact => arg,
                Fit::Widening | Fit::None => match arg.convert(ty) {
                    Ok(v) => v,
                    Err(raw) => {
                        tracing::debug!(
                            name = desc.name(),
                            index = i,
                            expected = %ty,
                            found = raw.kind(),
                            "argument has no conversion, passing raw value"
                        );
                        raw
                    }
                },
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/resolve.rs"]
mod tests;
