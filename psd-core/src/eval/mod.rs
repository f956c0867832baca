pub mod io;

#[cfg(test)]
mod tests;

use std::collections::VecDeque;

use crate::{
    environment::prelude::{
        runtime_error, ArrayInfo, Environment, RuntimeError, RuntimeErrorType, Value, ValueType
    },
    lexer::prelude::Token,
    parser::prelude::{
        ArrayAccess, AssignTarget, Binary, Block, Call, CompoundAssign, Declaration, Expression,
        ForStmt, Literal, Logical, Program, Statement, TypeAnnotation, Unary
    },
    utils::{fmt, prelude::SrcSpan}
};
use io::{InputSource, OutputSink};

/// Depth-first tree-walking evaluator.
///
/// One interpreter is one session: a fresh instance carries no state from
/// any earlier run. Declarations execute once into the global scope, then
/// the statements run against the scope chain. The first runtime fault
/// aborts evaluation and is returned to the caller.
pub struct Interpreter {
    env: Environment,
    // input tokens left over from the last read line
    pending_input: VecDeque<String>,
    output: Box<dyn OutputSink>,
    input: Box<dyn InputSource>,
}

impl Interpreter {
    pub fn new(output: Box<dyn OutputSink>, input: Box<dyn InputSource>) -> Self {
        Self {
            env: Environment::new(),
            pending_input: VecDeque::new(),
            output,
            input,
        }
    }

    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for declaration in &program.declarations {
            self.execute_declaration(declaration)?;
        }

        for statement in &program.statements {
            self.execute_statement(statement)?;
        }

        Ok(())
    }

    fn execute_declaration(&mut self, declaration: &Declaration) -> Result<(), RuntimeError> {
        match declaration {
            Declaration::Var(declaration) => {
                let (value_type, array_info) = self.evaluate_annotation(&declaration.annotation)?;

                for name in &declaration.names {
                    self.env.define(
                        &name.value,
                        value_type,
                        false,
                        array_info.clone(),
                        Value::Null,
                        name.location
                    )?;
                }

                Ok(())
            },
            Declaration::Const(declaration) => {
                let (value_type, array_info) = self.evaluate_annotation(&declaration.annotation)?;

                if array_info.is_some() {
                    return runtime_error(
                        RuntimeErrorType::ConstArrayDeclaration,
                        declaration.location
                    );
                }

                let value = self.evaluate(&declaration.initializer)?;

                if !value_type.accepts(&value) {
                    return runtime_error(
                        RuntimeErrorType::TypeMismatch {
                            name: declaration.name.value.clone(),
                            expected: value_type,
                            got: value.type_name(),
                        },
                        declaration.initializer.location()
                    );
                }

                self.env.define(
                    &declaration.name.value,
                    value_type,
                    true,
                    None,
                    value,
                    declaration.name.location
                )
            }
        }
    }

    // dimension expressions are evaluated here, at declaration time
    fn evaluate_annotation(
        &mut self,
        annotation: &TypeAnnotation,
    ) -> Result<(ValueType, Option<ArrayInfo>), RuntimeError> {
        match annotation {
            TypeAnnotation::Basic { name, .. } => Ok((ValueType::from(*name), None)),
            TypeAnnotation::Array { base, dimensions, .. } => {
                let mut sizes = vec![];

                for dimension in dimensions {
                    let size = match self.evaluate(dimension)? {
                        Value::Int(size) if size > 0 => size as usize,
                        Value::Real(size) if size.fract() == 0.0 && size > 0.0 => size as usize,
                        _ => return runtime_error(
                            RuntimeErrorType::InvalidDimension,
                            dimension.location()
                        )
                    };

                    sizes.push(size);
                }

                let base = ValueType::from(*base);

                Ok((base, Some(ArrayInfo { base, dimensions: sizes })))
            }
        }
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::Expression(expression) => {
                self.evaluate(expression)?;

                Ok(())
            },
            Statement::Block(block) => self.execute_block(block),
            Statement::If(statement) => {
                if self.evaluate(&statement.condition)?.is_truthy() {
                    self.execute_block(&statement.then_branch)
                } else if let Some(else_branch) = &statement.else_branch {
                    self.execute_statement(else_branch)
                } else {
                    Ok(())
                }
            },
            Statement::While(statement) => {
                while self.evaluate(&statement.condition)?.is_truthy() {
                    self.execute_block(&statement.body)?;
                }

                Ok(())
            },
            Statement::For(statement) => self.execute_for(statement),
            Statement::Repeat(statement) => {
                // the body always runs its first iteration
                loop {
                    self.execute_block(&statement.body)?;

                    if self.evaluate(&statement.condition)?.is_truthy() {
                        break;
                    }
                }

                Ok(())
            },
            Statement::Output(statement) => {
                let mut parts = vec![];

                for arg in &statement.args {
                    parts.push(self.evaluate(arg)?.to_string());
                }

                let mut message = parts.join(" ");
                message.push('\n');

                self.output.write_chunk(&message);

                Ok(())
            },
            Statement::Outputf(statement) => {
                let format = match self.evaluate(&statement.format)? {
                    Value::Str(format) => format,
                    _ => return runtime_error(
                        RuntimeErrorType::FormatNotText,
                        statement.format.location()
                    )
                };

                let mut values = vec![];

                for arg in &statement.args {
                    values.push(self.evaluate(arg)?);
                }

                self.output.write_chunk(&fmt::substitute(&format, &values));

                Ok(())
            },
            Statement::Input(statement) => self.execute_input(&statement.targets),
            // the format expression of inputf is ignored
            Statement::Inputf(statement) => self.execute_input(&statement.targets),
        }
    }

    // the child scope is dropped on every exit path, faulted ones included
    fn execute_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        self.env.enter_scope();

        let result = block.statements.iter()
            .try_for_each(|statement| self.execute_statement(statement));

        self.env.exit_scope();

        result
    }

    fn execute_for(&mut self, statement: &ForStmt) -> Result<(), RuntimeError> {
        // both bounds are evaluated exactly once
        let start = self.evaluate(&statement.start)?;
        let end = match self.evaluate(&statement.end)?.as_number() {
            Some(end) => end,
            None => return runtime_error(
                RuntimeErrorType::ForBoundsNotNumeric,
                statement.end.location()
            )
        };

        if start.as_number().is_none() {
            return runtime_error(
                RuntimeErrorType::ForBoundsNotNumeric,
                statement.start.location()
            );
        }

        let variable = &statement.variable;
        self.env.assign(&variable.value, start, variable.location)?;

        loop {
            let current = match self.env.get(&variable.value, variable.location)?.as_number() {
                Some(current) => current,
                None => return runtime_error(
                    RuntimeErrorType::ForBoundsNotNumeric,
                    variable.location
                )
            };

            if current > end {
                break;
            }

            self.execute_block(&statement.body)?;

            // increment by exactly one, through the ordinary assignment path
            let next = match self.env.get(&variable.value, variable.location)? {
                Value::Int(value) => Value::Int(value + 1),
                Value::Real(value) => Value::Real(value + 1.0),
                _ => return runtime_error(
                    RuntimeErrorType::ForBoundsNotNumeric,
                    variable.location
                )
            };

            self.env.assign(&variable.value, next, variable.location)?;
        }

        Ok(())
    }

    fn execute_input(&mut self, targets: &[Expression]) -> Result<(), RuntimeError> {
        for target in targets {
            let raw = match self.next_input_token() {
                Some(token) => token,
                None => return runtime_error(
                    RuntimeErrorType::InputExhausted,
                    target.location()
                )
            };

            self.assign_input_value(target, &raw)?;
        }

        Ok(())
    }

    // a fresh line is read only once the cached tokens run out
    fn next_input_token(&mut self) -> Option<String> {
        if self.pending_input.is_empty() {
            let line = self.input.read_line();

            self.pending_input.extend(line.split_whitespace().map(str::to_string));
        }

        self.pending_input.pop_front()
    }

    /// Converts a raw input token per the *declared* type of its target,
    /// then writes it through the same path as any other assignment.
    fn assign_input_value(&mut self, target: &Expression, raw: &str) -> Result<(), RuntimeError> {
        let expected = match target {
            Expression::Variable(name) => {
                self.env.descriptor(&name.value, name.location)?.value_type
            },
            Expression::ArrayAccess(access) => {
                let descriptor = self.env.descriptor(&access.name.value, access.name.location)?;

                match &descriptor.array_info {
                    Some(info) => info.base,
                    None => return runtime_error(
                        RuntimeErrorType::NotAnArray { name: access.name.value.clone() },
                        access.name.location
                    )
                }
            },
            other => return runtime_error(
                RuntimeErrorType::InvalidInputTarget,
                other.location()
            )
        };

        let value = convert_input(raw, expected, target.location())?;

        match target {
            Expression::Variable(name) => self.env.assign(&name.value, value, name.location),
            Expression::ArrayAccess(access) => {
                let indices = self.evaluate_indices(access)?;

                self.env.assign_array_element(&access.name.value, &indices, value, access.location)
            },
            _ => unreachable!("input target validated above"),
        }
    }

    fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Literal(literal) => Ok(literal_value(literal)),
            Expression::Grouping { expression, .. } => self.evaluate(expression),
            Expression::Variable(name) => self.env.get(&name.value, name.location),
            Expression::ArrayAccess(access) => {
                let indices = self.evaluate_indices(access)?;

                self.env.get_array_element(&access.name.value, &indices, access.location)
            },
            Expression::Assign(assign) => {
                let value = self.evaluate(&assign.value)?;

                self.env.assign(&assign.name.value, value.clone(), assign.name.location)?;

                Ok(value)
            },
            Expression::ArraySet(set) => {
                let value = self.evaluate(&set.value)?;
                let indices = self.evaluate_indices(&set.target)?;

                self.env.assign_array_element(
                    &set.target.name.value,
                    &indices,
                    value.clone(),
                    set.target.location
                )?;

                Ok(value)
            },
            Expression::CompoundAssign(assign) => self.evaluate_compound_assign(assign),
            Expression::Unary(unary) => self.evaluate_unary(unary),
            Expression::Logical(logical) => self.evaluate_logical(logical),
            Expression::Binary(binary) => self.evaluate_binary(binary),
            Expression::Call(call) => self.evaluate_call(call),
        }
    }

    fn evaluate_indices(&mut self, access: &ArrayAccess) -> Result<Vec<i64>, RuntimeError> {
        let mut indices = vec![];

        for index in &access.indices {
            let index_value = match self.evaluate(index)? {
                Value::Int(value) => value,
                Value::Real(value) if value.fract() == 0.0 => value as i64,
                _ => return runtime_error(
                    RuntimeErrorType::NonIntegerIndex { name: access.name.value.clone() },
                    index.location()
                )
            };

            indices.push(index_value);
        }

        Ok(indices)
    }

    fn evaluate_compound_assign(&mut self, assign: &CompoundAssign) -> Result<Value, RuntimeError> {
        let value = self.evaluate(&assign.value)?;

        let current = match &assign.target {
            AssignTarget::Variable(name) => self.env.get(&name.value, name.location)?,
            AssignTarget::Array(access) => {
                let indices = self.evaluate_indices(access)?;

                self.env.get_array_element(&access.name.value, &indices, access.location)?
            }
        };

        let (left, right) = match (current.as_number(), value.as_number()) {
            (Some(left), Some(right)) => (left, right),
            _ => return runtime_error(
                RuntimeErrorType::OperandsMustBeNumbers,
                assign.location
            )
        };

        // two integers stay in the integer domain, except for /=
        let next = match (&assign.operator, &current, &value) {
            (Token::PlusEqual, Value::Int(a), Value::Int(b)) => Value::Int(a + b),
            (Token::MinusEqual, Value::Int(a), Value::Int(b)) => Value::Int(a - b),
            (Token::StarEqual, Value::Int(a), Value::Int(b)) => Value::Int(a * b),
            (Token::PlusEqual, ..) => Value::Real(left + right),
            (Token::MinusEqual, ..) => Value::Real(left - right),
            (Token::StarEqual, ..) => Value::Real(left * right),
            (Token::SlashEqual, ..) => {
                if right == 0.0 {
                    return runtime_error(RuntimeErrorType::DivisionByZero, assign.location);
                }

                Value::Real(left / right)
            },
            _ => unreachable!("non-compound operator in compound assignment"),
        };

        match &assign.target {
            AssignTarget::Variable(name) => {
                self.env.assign(&name.value, next.clone(), name.location)?;
            },
            AssignTarget::Array(access) => {
                let indices = self.evaluate_indices(access)?;

                self.env.assign_array_element(
                    &access.name.value,
                    &indices,
                    next.clone(),
                    access.location
                )?;
            }
        }

        Ok(next)
    }

    fn evaluate_unary(&mut self, unary: &Unary) -> Result<Value, RuntimeError> {
        let operand = self.evaluate(&unary.operand)?;

        match &unary.operator {
            Token::Bang => Ok(Value::Boolean(!operand.is_truthy())),
            Token::Minus => match operand {
                Value::Int(value) => Ok(Value::Int(-value)),
                Value::Real(value) => Ok(Value::Real(-value)),
                _ => runtime_error(RuntimeErrorType::OperandMustBeNumber, unary.location)
            },
            _ => unreachable!("invalid unary operator `{}`", unary.operator.as_literal()),
        }
    }

    // the deciding operand is the result; the right side stays unevaluated
    fn evaluate_logical(&mut self, logical: &Logical) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&logical.left)?;

        match &logical.operator {
            Token::Or if left.is_truthy() => Ok(left),
            Token::And if !left.is_truthy() => Ok(left),
            Token::Or | Token::And => self.evaluate(&logical.right),
            _ => unreachable!("invalid logical operator `{}`", logical.operator.as_literal()),
        }
    }

    fn evaluate_binary(&mut self, binary: &Binary) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let span = binary.location;

        match &binary.operator {
            Token::EqualEqual => Ok(Value::Boolean(left.equals(&right))),
            Token::BangEqual => Ok(Value::Boolean(!left.equals(&right))),
            Token::Greater | Token::GreaterEqual | Token::Less | Token::LessEqual => {
                let (l, r) = numeric_operands(&left, &right, span)?;

                let result = match binary.operator {
                    Token::Greater => l > r,
                    Token::GreaterEqual => l >= r,
                    Token::Less => l < r,
                    Token::LessEqual => l <= r,
                    _ => unreachable!(),
                };

                Ok(Value::Boolean(result))
            },
            Token::Plus => match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
                _ => match (left.as_number(), right.as_number()) {
                    (Some(l), Some(r)) => Ok(Value::Real(l + r)),
                    // either side text concatenates the stringified operands
                    _ if left.is_text() || right.is_text() => {
                        Ok(Value::Str(format!("{left}{right}")))
                    },
                    _ => runtime_error(RuntimeErrorType::InvalidAddOperands, span)
                }
            },
            Token::Minus => match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a - b)),
                _ => {
                    let (l, r) = numeric_operands(&left, &right, span)?;

                    Ok(Value::Real(l - r))
                }
            },
            Token::Star => match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
                _ => {
                    let (l, r) = numeric_operands(&left, &right, span)?;

                    Ok(Value::Real(l * r))
                }
            },
            // `/` is always real division
            Token::Slash => {
                let (l, r) = numeric_operands(&left, &right, span)?;

                if r == 0.0 {
                    return runtime_error(RuntimeErrorType::DivisionByZero, span);
                }

                Ok(Value::Real(l / r))
            },
            // `div` floors the quotient
            Token::Div => {
                let (l, r) = numeric_operands(&left, &right, span)?;

                if r == 0.0 {
                    return runtime_error(RuntimeErrorType::DivisionByZero, span);
                }

                let quotient = (l / r).floor();

                match (&left, &right) {
                    (Value::Int(_), Value::Int(_)) => Ok(Value::Int(quotient as i64)),
                    _ => Ok(Value::Real(quotient))
                }
            },
            // native remainder, the sign follows the dividend
            Token::Mod => match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => {
                    if *b == 0 {
                        return runtime_error(RuntimeErrorType::DivisionByZero, span);
                    }

                    Ok(Value::Int(a % b))
                },
                _ => {
                    let (l, r) = numeric_operands(&left, &right, span)?;

                    Ok(Value::Real(l % r))
                }
            },
            _ => unreachable!("invalid binary operator `{}`", binary.operator.as_literal()),
        }
    }

    fn evaluate_call(&mut self, call: &Call) -> Result<Value, RuntimeError> {
        let callee = match call.callee.as_ref() {
            Expression::Variable(name) => name,
            other => return runtime_error(
                RuntimeErrorType::InvalidCallTarget,
                other.location()
            )
        };

        let mut args = vec![];

        for arg in &call.args {
            args.push(self.evaluate(arg)?);
        }

        // the one built-in; anything else is an unresolved function
        match callee.value.to_lowercase().as_str() {
            "length" => {
                if args.len() != 1 {
                    return runtime_error(
                        RuntimeErrorType::WrongArity { function: "length", expected: 1 },
                        call.location
                    );
                }

                match &args[0] {
                    Value::Str(value) => Ok(Value::Int(value.chars().count() as i64)),
                    Value::Array(items) => Ok(Value::Int(items.len() as i64)),
                    _ => runtime_error(RuntimeErrorType::InvalidLengthOperand, call.location)
                }
            },
            _ => runtime_error(
                RuntimeErrorType::UnknownFunction { name: callee.value.clone() },
                callee.location
            )
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Int { value, .. } => Value::Int(*value),
        Literal::Real { value, .. } => Value::Real(*value),
        Literal::Str { value, .. } => Value::Str(value.clone()),
        // characters live as single-element text values
        Literal::Char { value, .. } => Value::Str(value.to_string()),
        Literal::Bool { value, .. } => Value::Boolean(*value),
    }
}

fn numeric_operands(left: &Value, right: &Value, span: SrcSpan) -> Result<(f64, f64), RuntimeError> {
    match (left.as_number(), right.as_number()) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => runtime_error(RuntimeErrorType::OperandsMustBeNumbers, span)
    }
}
