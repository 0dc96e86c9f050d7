use crate::runtime::Registry;
use rust_decimal::Decimal;

pub(super) fn register(r: &mut Registry) {
    r.register("equals", |a: String, b: String| a == b)
        .register("equals", |a: i32, b: i32| a == b)
        .register("equals", |a: Decimal, b: Decimal| a == b)
        .register("equals", |a: bool, b: bool| a == b)
        .register("not", |v: bool| !v)
        .register("and", |a: bool, b: bool| a && b)
        .register("and", |a: bool, b: bool, c: bool| a && b && c)
        .register("or", |a: bool, b: bool| a || b)
        .register("or", |a: bool, b: bool, c: bool| a || b || c)
        .register("if", |c: bool, t: String, f: String| if c { t } else { f })
        .register("if", |c: bool, t: i32, f: i32| if c { t } else { f })
        .register("if", |c: bool, t: Decimal, f: Decimal| if c { t } else { f })
        .register("if", |c: bool, t: bool, f: bool| if c { t } else { f });

    compare(r, "greater", |o| o.is_gt());
    compare(r, "less", |o| o.is_lt());
    compare(r, "greaterorequals", |o| o.is_ge());
    compare(r, "lessorequals", |o| o.is_le());
}

/// Register the int and decimal overloads of one ordering predicate.
fn compare(r: &mut Registry, name: &str, pred: fn(std::cmp::Ordering) -> bool) {
    r.register(name, move |a: i32, b: i32| pred(a.cmp(&b)))
        .register(name, move |a: Decimal, b: Decimal| pred(a.cmp(&b)));
}

#[cfg(test)]
#[path = "../../tests/unit/stdlib/logical.rs"]
mod tests;
