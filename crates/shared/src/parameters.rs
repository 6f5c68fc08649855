use evalexpr::{
    build_operator_tree, ContextWithMutableVariables, HashMapContext, Node, Operator, Value,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

use crate::Dimension;

/// Результат вычисления параметра или размера
pub type ParameterResult = Result<f64, ParameterError>;

/// Ошибки при вычислении параметров
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Parameter '{0}' not found")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Evaluation error: {0}")]
    EvaluationError(String),
    #[error("Circular dependency: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),
    #[error("Invalid type: {0}")]
    InvalidType(String),
}

/// Именованный параметр сборки: число или формула над другими параметрами
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    Number { value: f64 },
    Formula { expression: String },
}

/// Таблица параметров файла сборки
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, Parameter>);

/// Вычисленные значения параметров для формул размеров
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterValues(HashMap<String, f64>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, parameter: Parameter) {
        self.0.insert(name.to_string(), parameter);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Вычислить параметр вместе с его зависимостями
    pub fn evaluate(&self, name: &str) -> ParameterResult {
        let mut path = Vec::new();
        let mut done = HashMap::new();
        self.evaluate_internal(name, &mut path, &mut done)
    }

    /// Вычислить все параметры; первая ошибка прерывает вычисление
    pub fn evaluate_all(&self) -> Result<ParameterValues, ParameterError> {
        let mut done = HashMap::new();
        for name in self.0.keys() {
            let mut path = Vec::new();
            self.evaluate_internal(name, &mut path, &mut done)?;
        }
        Ok(ParameterValues(done))
    }

    fn evaluate_internal(
        &self,
        name: &str,
        path: &mut Vec<String>,
        done: &mut HashMap<String, f64>,
    ) -> ParameterResult {
        if let Some(&value) = done.get(name) {
            return Ok(value);
        }
        if path.iter().any(|p| p == name) {
            path.push(name.to_string());
            return Err(ParameterError::CircularDependency(path.clone()));
        }

        let parameter = self
            .0
            .get(name)
            .ok_or_else(|| ParameterError::NotFound(name.to_string()))?;

        path.push(name.to_string());
        let result = match parameter {
            Parameter::Number { value } => Ok(*value),
            Parameter::Formula { expression } => {
                let deps = formula_identifiers(expression)?;
                let mut values = ParameterValues::default();
                for dep in deps {
                    if is_constant(&dep) {
                        continue;
                    }
                    let value = self.evaluate_internal(&dep, path, done)?;
                    values.0.insert(dep, value);
                }
                eval_formula(expression, &values)
            }
        };
        path.pop();

        let value = result?;
        done.insert(name.to_string(), value);
        Ok(value)
    }
}

impl ParameterValues {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }
}

impl Dimension {
    /// Вычислить размер; формулам доступны параметры, а также `PI` и `E`
    pub fn resolve(&self, values: &ParameterValues) -> ParameterResult {
        match self {
            Dimension::Number(value) => Ok(*value),
            Dimension::Formula(expression) => {
                for ident in formula_identifiers(expression)? {
                    if !is_constant(&ident) && values.get(&ident).is_none() {
                        return Err(ParameterError::NotFound(ident));
                    }
                }
                eval_formula(expression, values)
            }
        }
    }
}

fn is_constant(name: &str) -> bool {
    matches!(name, "PI" | "E")
}

/// Имена переменных, используемых в формуле
fn formula_identifiers(expression: &str) -> Result<HashSet<String>, ParameterError> {
    let tree =
        build_operator_tree(expression).map_err(|e| ParameterError::ParseError(e.to_string()))?;
    Ok(tree
        .iter_variable_identifiers()
        .map(|s| s.to_string())
        .collect())
}

/// Разобрать формулу, переведя целые литералы во float: `25 / 2` даёт 12.5
fn float_tree(expression: &str) -> Result<Node, ParameterError> {
    let mut tree =
        build_operator_tree(expression).map_err(|e| ParameterError::ParseError(e.to_string()))?;
    for operator in tree.iter_operators_mut() {
        if let Operator::Const {
            value: Value::Int(i),
        } = operator
        {
            let value = Value::Float(*i as f64);
            *operator = Operator::Const { value };
        }
    }
    Ok(tree)
}

fn eval_formula(expression: &str, values: &ParameterValues) -> ParameterResult {
    let mut context = HashMapContext::new();
    for (name, value) in &values.0 {
        context
            .set_value(name.clone(), Value::Float(*value))
            .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;
    }
    context
        .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
        .ok();
    context
        .set_value("E".to_string(), Value::Float(std::f64::consts::E))
        .ok();

    let tree = float_tree(expression)?;
    let value = tree
        .eval_with_context(&context)
        .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;

    match value {
        Value::Float(f) => Ok(f),
        Value::Int(i) => Ok(i as f64),
        _ => Err(ParameterError::InvalidType(format!(
            "Expected number, got {:?}",
            value
        ))),
    }
}
