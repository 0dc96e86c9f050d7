use crate::runtime::{CallError, Registry, Variadic};
use rust_decimal::Decimal;

fn overflow(op: &str) -> CallError {
    CallError::failed(format!("{op} overflowed"))
}

pub(super) fn register(r: &mut Registry) {
    r.register("add", |a: i32, b: i32| {
        a.checked_add(b).ok_or_else(|| overflow("add"))
    })
    .register("add", |a: Decimal, b: Decimal| {
        a.checked_add(b).ok_or_else(|| overflow("add"))
    })
    .register("sub", |a: i32, b: i32| {
        a.checked_sub(b).ok_or_else(|| overflow("sub"))
    })
    .register("sub", |a: Decimal, b: Decimal| {
        a.checked_sub(b).ok_or_else(|| overflow("sub"))
    })
    .register("mult", |a: i32, b: i32| {
        a.checked_mul(b).ok_or_else(|| overflow("mult"))
    })
    .register("mult", |a: Decimal, b: Decimal| {
        a.checked_mul(b).ok_or_else(|| overflow("mult"))
    })
    .register("div", |a: i32, b: i32| {
        if b == 0 {
            return Err(CallError::failed("division by zero"));
        }
        a.checked_div(b).ok_or_else(|| overflow("div"))
    })
    .register("div", |a: Decimal, b: Decimal| {
        if b.is_zero() {
            return Err(CallError::failed("division by zero"));
        }
        a.checked_div(b).ok_or_else(|| overflow("div"))
    })
    .register("abs", |a: i32| a.checked_abs().ok_or_else(|| overflow("abs")))
    .register("abs", |a: Decimal| a.abs())
    .register_variadic("max", |Variadic(xs): Variadic<i32>| {
        xs.into_iter().max().ok_or_else(no_operands)
    })
    .register_variadic("max", |Variadic(xs): Variadic<Decimal>| {
        xs.into_iter().max().ok_or_else(no_operands)
    })
    .register_variadic("min", |Variadic(xs): Variadic<i32>| {
        xs.into_iter().min().ok_or_else(no_operands)
    })
    .register_variadic("min", |Variadic(xs): Variadic<Decimal>| {
        xs.into_iter().min().ok_or_else(no_operands)
    });
}

fn no_operands() -> CallError {
    CallError::failed("expected at least one operand")
}

#[cfg(test)]
#[path = "../../tests/unit/stdlib/math.rs"]
mod tests;
