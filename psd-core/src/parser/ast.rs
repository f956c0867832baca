use std::fmt::Display;

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::SrcSpan
};

// program -> program <name> kamus { <declaration> } algoritma { <statement> } endprogram
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: Identifier,
    pub declarations: Vec<Declaration>,
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Program {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = match parser.expect_one(Token::Program) {
            Ok(span) => span,
            Err(error) => return parse_error(ParseErrorType::ExpectedProgram, error.span)
        };

        let name = Identifier::from(parser.expect_ident()?);

        if let Err(error) = parser.expect_one(Token::Kamus) {
            return parse_error(ParseErrorType::ExpectedKamus, error.span);
        }

        let mut declarations = vec![];
        while !parser.check(&Token::Algoritma) && !parser.is_at_end() {
            match Declaration::parse(parser, None) {
                Ok(declaration) => declarations.push(declaration),
                Err(error) => parser.recover(error)
            }
        }

        if let Err(error) = parser.expect_one(Token::Algoritma) {
            return parse_error(ParseErrorType::ExpectedAlgoritma, error.span);
        }

        let mut statements = vec![];
        while !parser.check(&Token::Endprogram) && !parser.is_at_end() {
            match Statement::parse(parser, None) {
                Ok(statement) => statements.push(statement),
                Err(error) => parser.recover(error)
            }
        }

        let (_, end) = match parser.expect_one(Token::Endprogram) {
            Ok(span) => span,
            Err(error) => return parse_error(ParseErrorType::ExpectedEndprogram, error.span)
        };

        match &parser.current_token {
            Some((_, Token::Eof, _)) | None => {},
            Some((start, token, end)) => return parse_error(
                ParseErrorType::UnexpectedToken {
                    token: token.clone(),
                    expected: vec!["end of file".to_string()]
                },
                SrcSpan { start: *start, end: *end }
            )
        }

        Ok(Self {
            name,
            declarations,
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let declarations = self.declarations.iter()
            .map(|declaration| declaration.to_string())
            .collect::<Vec<String>>();
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "program {} kamus {} algoritma {} endprogram",
            self.name,
            declarations.join(" "),
            statements.join(" ")
        )
    }
}

// declaration -> <const_decl> | <var_decl>
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Var(VarDecl),
    Const(ConstDecl),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Declaration {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let declaration = match &parser.current_token {
            Some((_, Token::Const, _)) => Self::Const(ConstDecl::parse(parser, None)?),
            Some(_) => Self::Var(VarDecl::parse(parser, None)?),
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        Ok(declaration)
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Var(declaration) => write!(f, "{declaration}"),
            Self::Const(declaration) => write!(f, "{declaration}")
        }
    }
}

impl Declaration {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Var(declaration) => declaration.location,
            Self::Const(declaration) => declaration.location
        }
    }
}

// var_decl -> <identifier> {, <identifier>} : <type>
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub names: Vec<Identifier>,
    pub annotation: TypeAnnotation,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for VarDecl {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut names = vec![Identifier::from(parser.expect_ident()?)];

        while let Ok(_) = parser.expect_one(Token::Comma) {
            names.push(parser.expect_ident()?.into());
        }

        parser.expect_one(Token::Colon)?;

        let annotation = TypeAnnotation::parse(parser, None)?;

        let location = SrcSpan {
            start: names[0].location.start,
            end: annotation.location().end
        };

        Ok(Self {
            names,
            annotation,
            location
        })
    }
}

impl Display for VarDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names.iter()
            .map(|name| name.to_string())
            .collect::<Vec<String>>();

        write!(f, "{} : {}", names.join(", "), self.annotation)
    }
}

// const_decl -> const <identifier> : <type> = <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: Identifier,
    pub annotation: TypeAnnotation,
    pub initializer: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ConstDecl {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Const)?;

        let name = Identifier::from(parser.expect_ident()?);

        parser.expect_one(Token::Colon)?;
        let annotation = TypeAnnotation::parse(parser, None)?;

        parser.expect_one(Token::Equal)?;
        let initializer = Expression::parse(parser, None)?;

        let location = SrcSpan { start, end: initializer.location().end };

        Ok(Self {
            name,
            annotation,
            initializer,
            location
        })
    }
}

impl Display for ConstDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "const {} : {} = {}", self.name, self.annotation, self.initializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Integer,
    Real,
    String,
    Character,
    Boolean
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::Character => "character",
            Self::Boolean => "boolean"
        };

        write!(f, "{name}")
    }
}

impl From<Token> for TypeName {
    fn from(value: Token) -> Self {
        match value {
            Token::Integer => Self::Integer,
            Token::Real => Self::Real,
            Token::String => Self::String,
            Token::Character => Self::Character,
            Token::Boolean => Self::Boolean,
            _ => panic!("Invalid token to type name conversion")
        }
    }
}

// type -> <basic_type> { "[" <expression> "]" }
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    Basic {
        name: TypeName,
        location: SrcSpan
    },
    Array {
        base: TypeName,
        dimensions: Vec<Expression>,
        location: SrcSpan
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for TypeAnnotation {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, name, mut end) = match parser.current_token.take() {
            Some((start, token, end)) if token.is_type_keyword() => {
                parser.step();
                (start, TypeName::from(token), end)
            },
            token => {
                let span = match &token {
                    Some((start, _, end)) => SrcSpan { start: *start, end: *end },
                    None => SrcSpan { start: 0, end: 0 }
                };
                parser.current_token = token;

                return parse_error(ParseErrorType::ExpectedType, span);
            }
        };

        let mut dimensions = vec![];

        while let Ok(_) = parser.expect_one(Token::LeftBracket) {
            dimensions.push(Expression::parse(parser, None)?);

            let (_, bracket_end) = parser.expect_one(Token::RightBracket)?;
            end = bracket_end;
        }

        let location = SrcSpan { start, end };

        if dimensions.is_empty() {
            Ok(Self::Basic { name, location })
        } else {
            Ok(Self::Array { base: name, dimensions, location })
        }
    }
}

impl Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { name, .. } => write!(f, "{name}"),
            Self::Array { base, dimensions, .. } => {
                write!(f, "{base}")?;

                for dimension in dimensions {
                    write!(f, "[{dimension}]")?;
                }

                Ok(())
            }
        }
    }
}

impl TypeAnnotation {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Basic { location, .. } |
            Self::Array { location, .. } => *location
        }
    }
}

// statement -> <if> | <while> | <for> | <repeat> | <output> | <outputf> | <input> | <inputf> | <expression>
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Repeat(RepeatStmt),
    Output(OutputStmt),
    Outputf(OutputfStmt),
    Input(InputStmt),
    Inputf(InputfStmt),
    Block(Block),
    Expression(Expression),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let statement = match &parser.current_token {
            Some((_, token, _)) => match token {
                Token::If => Self::If(IfStmt::parse(parser, None)?),
                Token::While => Self::While(WhileStmt::parse(parser, None)?),
                Token::For => Self::For(ForStmt::parse(parser, None)?),
                Token::Repeat => Self::Repeat(RepeatStmt::parse(parser, None)?),
                Token::Output => Self::Output(OutputStmt::parse(parser, None)?),
                Token::Outputf => Self::Outputf(OutputfStmt::parse(parser, None)?),
                Token::Input => Self::Input(InputStmt::parse(parser, None)?),
                Token::Inputf => Self::Inputf(InputfStmt::parse(parser, None)?),
                _ => Self::Expression(Expression::parse(parser, None)?)
            },
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        Ok(statement)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::If(statement) => write!(f, "{statement}"),
            Self::While(statement) => write!(f, "{statement}"),
            Self::For(statement) => write!(f, "{statement}"),
            Self::Repeat(statement) => write!(f, "{statement}"),
            Self::Output(statement) => write!(f, "{statement}"),
            Self::Outputf(statement) => write!(f, "{statement}"),
            Self::Input(statement) => write!(f, "{statement}"),
            Self::Inputf(statement) => write!(f, "{statement}"),
            Self::Block(block) => write!(f, "{block}"),
            Self::Expression(expression) => write!(f, "{expression}")
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::If(statement) => statement.location,
            Self::While(statement) => statement.location,
            Self::For(statement) => statement.location,
            Self::Repeat(statement) => statement.location,
            Self::Output(statement) => statement.location,
            Self::Outputf(statement) => statement.location,
            Self::Input(statement) => statement.location,
            Self::Inputf(statement) => statement.location,
            Self::Block(block) => block.location,
            Self::Expression(expression) => expression.location()
        }
    }
}

// block -> { <statement> }
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl Block {
    fn parse_until<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        stops: &[Token]
    ) -> Result<Self, ParseError> {
        let start = parser.current_span().start;
        let mut end = start;

        let mut statements = vec![];

        while !stops.iter().any(|stop| parser.check(stop)) && !parser.is_at_end() {
            let statement = Statement::parse(parser, None)?;
            end = statement.location().end;
            statements.push(statement);
        }

        Ok(Self {
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join(" "))
    }
}

// if -> if <expression> then <block> {else if <expression> then <block>} [else <block>] endif
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expression,
    pub then_branch: Block,
    // either a Block or a nested If, forming a right-nested else-if chain
    pub else_branch: Option<Box<Statement>>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for IfStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        let chain = Self::parse_chain(parser, start)?;

        // the single endif of the whole chain belongs to the outermost if
        let (_, end) = parser.expect_one(Token::Endif)?;

        Ok(Self {
            location: SrcSpan { start: chain.location.start, end },
            ..chain
        })
    }
}

impl IfStmt {
    fn parse_chain<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        start: u32
    ) -> Result<Self, ParseError> {
        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::Then)?;

        let then_branch = Block::parse_until(parser, &[Token::Else, Token::Endif])?;
        let mut end = then_branch.location.end;

        let else_branch = match parser.expect_one(Token::Else) {
            Ok(_) => match parser.expect_one(Token::If) {
                Ok((if_start, _)) => {
                    let nested = Self::parse_chain(parser, if_start)?;
                    end = nested.location.end;

                    Some(Box::new(Statement::If(nested)))
                },
                Err(_) => {
                    let block = Block::parse_until(parser, &[Token::Endif])?;
                    end = block.location.end;

                    Some(Box::new(Statement::Block(block)))
                }
            },
            Err(_) => None
        };

        Ok(Self {
            condition,
            then_branch,
            else_branch,
            location: SrcSpan { start, end }
        })
    }

    fn fmt_chain(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if {} then {}", self.condition, self.then_branch)?;

        match &self.else_branch {
            Some(statement) => match statement.as_ref() {
                Statement::If(nested) => {
                    write!(f, " else ")?;
                    nested.fmt_chain(f)
                },
                other => write!(f, " else {other}")
            },
            None => Ok(())
        }
    }
}

impl Display for IfStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_chain(f)?;
        write!(f, " endif")
    }
}

// while -> while <expression> then <block> endwhile
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expression,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for WhileStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::While)?;

        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::Then)?;

        let body = Block::parse_until(parser, &[Token::Endwhile])?;
        let (_, end) = parser.expect_one(Token::Endwhile)?;

        Ok(Self {
            condition,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for WhileStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "while {} then {} endwhile", self.condition, self.body)
    }
}

// for -> for <identifier> = <expression> to <expression> then <block> endfor
//
// The loop variable is not declared by the loop, it must already exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub variable: Identifier,
    pub start: Expression,
    pub end: Expression,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ForStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (for_start, _) = parser.expect_one(Token::For)?;

        let variable = Identifier::from(parser.expect_ident()?);

        parser.expect_one(Token::Equal)?;
        let start = Expression::parse(parser, None)?;

        parser.expect_one(Token::To)?;
        let end = Expression::parse(parser, None)?;

        parser.expect_one(Token::Then)?;
        let body = Block::parse_until(parser, &[Token::Endfor])?;
        let (_, for_end) = parser.expect_one(Token::Endfor)?;

        Ok(Self {
            variable,
            start,
            end,
            body,
            location: SrcSpan { start: for_start, end: for_end }
        })
    }
}

impl Display for ForStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "for {} = {} to {} then {} endfor",
            self.variable,
            self.start,
            self.end,
            self.body
        )
    }
}

// repeat -> repeat <block> untuk <expression>
//
// The terminating condition follows the body, there is no paired
// opening keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub body: Block,
    pub condition: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for RepeatStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Repeat)?;

        let body = Block::parse_until(parser, &[Token::Untuk])?;
        parser.expect_one(Token::Untuk)?;

        let condition = Expression::parse(parser, None)?;

        let location = SrcSpan { start, end: condition.location().end };

        Ok(Self {
            body,
            condition,
            location
        })
    }
}

impl Display for RepeatStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "repeat {} untuk {}", self.body, self.condition)
    }
}

// output -> output ( [<expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct OutputStmt {
    pub args: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for OutputStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Output)?;
        parser.expect_one(Token::LeftParen)?;

        let (args, end) = call_arguments(parser)?;

        Ok(Self {
            args,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for OutputStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "output({})", join_expressions(&self.args))
    }
}

// outputf -> outputf ( <expression> [, <expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct OutputfStmt {
    pub format: Expression,
    pub args: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for OutputfStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Outputf)?;
        parser.expect_one(Token::LeftParen)?;

        let format = Expression::parse(parser, None)?;

        let (args, end) = match parser.expect_one(Token::Comma) {
            Ok(_) => call_arguments(parser)?,
            Err(_) => {
                let (_, end) = parser.expect_one(Token::RightParen)?;
                (vec![], end)
            }
        };

        Ok(Self {
            format,
            args,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for OutputfStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.args.is_empty() {
            write!(f, "outputf({})", self.format)
        } else {
            write!(f, "outputf({}, {})", self.format, join_expressions(&self.args))
        }
    }
}

// input -> input ( [<expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct InputStmt {
    pub targets: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for InputStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Input)?;
        parser.expect_one(Token::LeftParen)?;

        let (targets, end) = call_arguments(parser)?;

        Ok(Self {
            targets,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for InputStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "input({})", join_expressions(&self.targets))
    }
}

// inputf -> inputf ( <expression> [, <expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct InputfStmt {
    pub format: Expression,
    pub targets: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for InputfStmt {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Inputf)?;
        parser.expect_one(Token::LeftParen)?;

        let format = Expression::parse(parser, None)?;

        let (targets, end) = match parser.expect_one(Token::Comma) {
            Ok(_) => call_arguments(parser)?,
            Err(_) => {
                let (_, end) = parser.expect_one(Token::RightParen)?;
                (vec![], end)
            }
        };

        Ok(Self {
            format,
            targets,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for InputfStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.targets.is_empty() {
            write!(f, "inputf({})", self.format)
        } else {
            write!(f, "inputf({}, {})", self.format, join_expressions(&self.targets))
        }
    }
}

fn call_arguments<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>
) -> Result<(Vec<Expression>, u32), ParseError> {
    let mut args = vec![];

    if !parser.check(&Token::RightParen) {
        args.push(Expression::parse(parser, None)?);

        while let Ok(_) = parser.expect_one(Token::Comma) {
            args.push(Expression::parse(parser, None)?);
        }
    }

    let (_, end) = parser.expect_one(Token::RightParen)?;

    Ok((args, end))
}

fn join_expressions(expressions: &[Expression]) -> String {
    expressions.iter()
        .map(|expression| expression.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

// expression -> <assignment>
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(Identifier),
    Grouping {
        expression: Box<Expression>,
        location: SrcSpan
    },
    Unary(Unary),
    Binary(Binary),
    Logical(Logical),
    Assign(Assign),
    CompoundAssign(CompoundAssign),
    Call(Call),
    ArrayAccess(ArrayAccess),
    ArraySet(ArraySet),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut expression = match &parser.current_token {
            Some((start, token, end)) => match token {
                Token::Ident(_) => Self::Variable(Identifier::from(parser.expect_ident()?)),
                Token::Bang | Token::Minus => Self::Unary(Unary::parse(parser, None)?),
                Token::Int(_)
                | Token::Float(_)
                | Token::Str(_)
                | Token::Char(_)
                | Token::True
                | Token::False => Self::Literal(Literal::parse(parser, None)?),
                Token::LeftParen => {
                    let (start, _) = parser.expect_one(Token::LeftParen)?;

                    let expression = Box::new(Expression::parse(parser, None)?);

                    let (_, end) = parser.expect_one(Token::RightParen)?;

                    Self::Grouping {
                        expression,
                        location: SrcSpan { start, end }
                    }
                },
                _ => return parse_error(
                    ParseErrorType::ExpectedExpression { token: token.clone() },
                    SrcSpan { start: *start, end: *end }
                )
            },
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        let precedence = precedence.unwrap_or(Precedence::Lowest);

        loop {
            if precedence >= parser.current_precedence() {
                break;
            }

            expression = match &parser.current_token {
                Some((_, token, _)) => match token {
                    Token::Equal => match expression {
                        Self::Variable(name) => Self::Assign(Assign::parse_with(parser, name)?),
                        Self::ArrayAccess(target) => Self::ArraySet(ArraySet::parse_with(parser, target)?),
                        other => return parse_error(
                            ParseErrorType::InvalidAssignmentTarget,
                            other.location()
                        )
                    },
                    Token::PlusEqual
                    | Token::MinusEqual
                    | Token::StarEqual
                    | Token::SlashEqual => {
                        let target = match expression {
                            Self::Variable(name) => AssignTarget::Variable(name),
                            Self::ArrayAccess(access) => AssignTarget::Array(access),
                            other => return parse_error(
                                ParseErrorType::InvalidAssignmentTarget,
                                other.location()
                            )
                        };

                        Self::CompoundAssign(CompoundAssign::parse_with(parser, target)?)
                    },
                    Token::And | Token::Or => {
                        Self::Logical(Logical::parse(parser, expression, precedence.into())?)
                    },
                    Token::Plus | Token::Minus | Token::Star | Token::Slash
                    | Token::Div | Token::Mod
                    | Token::EqualEqual | Token::BangEqual
                    | Token::Less | Token::LessEqual
                    | Token::Greater | Token::GreaterEqual => {
                        Self::Binary(Binary::parse(parser, expression, precedence.into())?)
                    },
                    Token::LeftParen => Self::Call(Call::parse_with(parser, expression)?),
                    Token::LeftBracket => match expression {
                        Self::Variable(name) => Self::ArrayAccess(ArrayAccess::parse_with(parser, name)?),
                        other => return parse_error(
                            ParseErrorType::InvalidIndexTarget,
                            other.location()
                        )
                    },
                    _ => break
                },
                None => break
            };
        }

        Ok(expression)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Variable(name) => write!(f, "{name}"),
            Self::Grouping { expression, .. } => write!(f, "({expression})"),
            Self::Unary(unary) => write!(f, "{unary}"),
            Self::Binary(binary) => write!(f, "{binary}"),
            Self::Logical(logical) => write!(f, "{logical}"),
            Self::Assign(assign) => write!(f, "{assign}"),
            Self::CompoundAssign(assign) => write!(f, "{assign}"),
            Self::Call(call) => write!(f, "{call}"),
            Self::ArrayAccess(access) => write!(f, "{access}"),
            Self::ArraySet(set) => write!(f, "{set}")
        }
    }
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Literal(literal) => literal.location(),
            Self::Variable(name) => name.location,
            Self::Grouping { location, .. } => *location,
            Self::Unary(unary) => unary.location,
            Self::Binary(binary) => binary.location,
            Self::Logical(logical) => logical.location,
            Self::Assign(assign) => assign.location,
            Self::CompoundAssign(assign) => assign.location,
            Self::Call(call) => call.location,
            Self::ArrayAccess(access) => access.location,
            Self::ArraySet(set) => set.location
        }
    }
}

// identifier -> <letter> { <letter> | <digit> }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

// unary -> (! | -) <unary>
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Token,
    pub operand: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Unary {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, operator, _) = parser.next_token().unwrap();

        let operand = Expression::parse(parser, Some(Precedence::Prefix))?;
        let end = operand.location().end;

        Ok(Self {
            operator,
            operand: Box::new(operand),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Unary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.operator.as_literal(), self.operand)
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Binary {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();
        let (_, operator, _) = parser.next_token().unwrap();

        let right = Expression::parse(parser, Some(precedence))?;

        let location = SrcSpan {
            start: left.location().start,
            end: right.location().end
        };

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location
        })
    }
}

impl Display for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator.as_literal(), self.right)
    }
}

// logical -> <expression> (and | or) <expression>
//
// Kept apart from Binary because the right side must not be evaluated
// once the left side decides the result.
#[derive(Debug, Clone, PartialEq)]
pub struct Logical {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Logical {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();
        let (_, operator, _) = parser.next_token().unwrap();

        let right = Expression::parse(parser, Some(precedence))?;

        let location = SrcSpan {
            start: left.location().start,
            end: right.location().end
        };

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location
        })
    }
}

impl Display for Logical {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator.as_literal(), self.right)
    }
}

// assignment -> <identifier> = <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: Identifier,
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl Assign {
    fn parse_with<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        name: Identifier
    ) -> Result<Self, ParseError> {
        parser.expect_one(Token::Equal)?;

        // right-associative
        let value = Expression::parse(parser, None)?;

        let location = SrcSpan {
            start: name.location.start,
            end: value.location().end
        };

        Ok(Self {
            name,
            value: Box::new(value),
            location
        })
    }
}

impl Display for Assign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Variable(Identifier),
    Array(ArrayAccess),
}

impl AssignTarget {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Variable(name) => name.location,
            Self::Array(access) => access.location
        }
    }
}

impl Display for AssignTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable(name) => write!(f, "{name}"),
            Self::Array(access) => write!(f, "{access}")
        }
    }
}

// compound_assignment -> <target> (+= | -= | *= | /=) <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundAssign {
    pub target: AssignTarget,
    pub operator: Token,
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl CompoundAssign {
    fn parse_with<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        target: AssignTarget
    ) -> Result<Self, ParseError> {
        let (_, operator, _) = parser.next_token().unwrap();

        let value = Expression::parse(parser, None)?;

        let location = SrcSpan {
            start: target.location().start,
            end: value.location().end
        };

        Ok(Self {
            target,
            operator,
            value: Box::new(value),
            location
        })
    }
}

impl Display for CompoundAssign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.target, self.operator.as_literal(), self.value)
    }
}

// call -> <expression> ( [<expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expression>,
    pub args: Vec<Expression>,
    pub location: SrcSpan
}

impl Call {
    fn parse_with<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        callee: Expression
    ) -> Result<Self, ParseError> {
        parser.expect_one(Token::LeftParen)?;

        let (args, end) = call_arguments(parser)?;

        let location = SrcSpan {
            start: callee.location().start,
            end
        };

        Ok(Self {
            callee: Box::new(callee),
            args,
            location
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.callee, join_expressions(&self.args))
    }
}

// array_access -> <identifier> "[" <expression> "]" { "[" <expression> "]" }
//
// Indexing is legal only directly on an identifier, never on an
// arbitrary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub name: Identifier,
    pub indices: Vec<Expression>,
    pub location: SrcSpan
}

impl ArrayAccess {
    fn parse_with<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        name: Identifier
    ) -> Result<Self, ParseError> {
        let mut indices = vec![];
        let mut end = name.location.end;

        while let Ok(_) = parser.expect_one(Token::LeftBracket) {
            indices.push(Expression::parse(parser, None)?);

            let (_, bracket_end) = parser.expect_one(Token::RightBracket)?;
            end = bracket_end;
        }

        let location = SrcSpan {
            start: name.location.start,
            end
        };

        Ok(Self {
            name,
            indices,
            location
        })
    }
}

impl Display for ArrayAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;

        for index in &self.indices {
            write!(f, "[{index}]")?;
        }

        Ok(())
    }
}

// array_set -> <array_access> = <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySet {
    pub target: ArrayAccess,
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl ArraySet {
    fn parse_with<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        target: ArrayAccess
    ) -> Result<Self, ParseError> {
        parser.expect_one(Token::Equal)?;

        // right-associative
        let value = Expression::parse(parser, None)?;

        let location = SrcSpan {
            start: target.location.start,
            end: value.location().end
        };

        Ok(Self {
            target,
            value: Box::new(value),
            location
        })
    }
}

impl Display for ArraySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

// literal -> <int> | <real> | <string> | <char> | benar | salah
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int {
        value: i64,
        location: SrcSpan
    },
    Real {
        value: f64,
        location: SrcSpan
    },
    Str {
        value: String,
        location: SrcSpan
    },
    Char {
        value: char,
        location: SrcSpan
    },
    Bool {
        value: bool,
        location: SrcSpan
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Literal {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match parser.next_token() {
            Some((start, token, end)) => {
                let location = SrcSpan { start, end };

                let literal = match token {
                    Token::Int(value) => Self::Int { value, location },
                    Token::Float(value) => Self::Real { value, location },
                    Token::Str(value) => Self::Str { value, location },
                    Token::Char(value) => Self::Char { value, location },
                    Token::True => Self::Bool { value: true, location },
                    Token::False => Self::Bool { value: false, location },
                    _ => unreachable!("literal parse dispatched on a non-literal token"),
                };

                Ok(literal)
            },
            None => unreachable!("literal parse dispatched at end of input"),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int { value, .. } => write!(f, "{value}"),
            Self::Real { value, .. } => write!(f, "{value}"),
            Self::Str { value, .. } => write!(f, "\"{value}\""),
            Self::Char { value, .. } => write!(f, "'{value}'"),
            Self::Bool { value, .. } => write!(f, "{value}")
        }
    }
}

impl Literal {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Int { location, .. } |
            Self::Real { location, .. } |
            Self::Str { location, .. } |
            Self::Char { location, .. } |
            Self::Bool { location, .. } => *location
        }
    }
}
