use log::debug;
use minisat::{*, unary::*};

/// Minimizes the number of true literals in `cost` and asserts the optimum
/// permanently, so that later criteria are optimized under it.
///
/// Returns the optimal count, or `None` if the solver is unsatisfiable
/// already before any bound is imposed.
pub fn minimize(solver: &mut Solver, cost: &[Bool]) -> Option<usize> {
    let init_cost = match solver.solve_under_assumptions(Vec::new()) {
        Ok(model) => cost.iter().filter(|l| model.value(*l)).count(),
        Err(()) => return None,
    };
    debug!("minimize: first solve has cost {}", init_cost);
    if init_cost == 0 {
        solver.add_clause(cost.iter().map(|l| !*l));
        return Some(0);
    }

    let terms = cost.iter().map(|l| Unary::from_bool(*l)).collect::<Vec<Unary>>();
    let sum_cost = Unary::sum_truncate(solver, terms, init_cost + 1);

    let (mut lo, mut hi): (usize, usize) = (0, init_cost);
    while lo < hi {
        let mid = (lo + hi) / 2;
        let bound = sum_cost.lte_const(mid as isize);
        if solver.solve_under_assumptions(vec![bound]).is_ok() {
            debug!("minimize: success l{} m{} h{}, setting h to m", lo, mid, hi);
            hi = mid;
            solver.add_clause(vec![bound]);
        } else {
            debug!("minimize: failed l{} m{} h{}, setting l to m+1", lo, mid, hi);
            lo = mid + 1;
        }
    }

    solver.add_clause(vec![sum_cost.lte_const(lo as isize)]);
    Some(lo)
}
