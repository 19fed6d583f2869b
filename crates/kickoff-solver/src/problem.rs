use crate::solution::SolverError;

/// A binary integer program: every variable takes the value 0 or 1
#[derive(Debug, Clone)]
pub struct MipProblem {
    /// Variable names, indexed by position
    pub variables: Vec<String>,
    /// Objective function coefficients
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone)]
pub struct Objective {
    /// Coefficient for each variable (dense, same length as `variables`)
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Sparse `(variable index, coefficient)` terms
    pub terms: Vec<(usize, f64)>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl ConstraintOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        }
    }

    /// Whether `lhs op rhs` holds within `tolerance`
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            ConstraintOp::Le => lhs <= rhs + tolerance,
            ConstraintOp::Ge => lhs >= rhs - tolerance,
            ConstraintOp::Eq => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl Constraint {
    /// Left-hand side evaluated at `values`
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(var, coeff)| coeff * values[var]).sum()
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.op.holds(self.lhs(values), self.rhs, tolerance)
    }
}

impl MipProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                minimize: true,
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective { coefficients, minimize };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, terms: Vec<(usize, f64)>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            terms,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check that the objective and every constraint only reference known variables
    pub fn validate(&self) -> Result<(), SolverError> {
        let n = self.variables.len();
        if self.objective.coefficients.len() != n {
            return Err(SolverError::ObjectiveMismatch {
                expected: n,
                found: self.objective.coefficients.len(),
            });
        }
        for c in &self.constraints {
            if let Some(&(index, _)) = c.terms.iter().find(|(index, _)| *index >= n) {
                return Err(SolverError::UnknownVariable {
                    constraint: c.name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// Objective value of an assignment
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective
            .coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }

    /// Names of the constraints violated by `values`
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .map(|c| c.name.as_str())
            .collect()
    }
}
