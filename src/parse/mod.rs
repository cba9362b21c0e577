/*
* Copyright (C) 2026  Henrique Almeida
* This file is part of WAZebra.
*
* WAZebra is free software: you can redistribute it and/or modify
* it under the terms of the GNU Affero General Public License as published
* by the Free Software Foundation, either version 3 of the License, or
* (at your option) any later version.
*
* WAZebra is distributed in the hope that it will be useful,
* but WITHOUT ANY WARRANTY; without even the implied warranty of
* MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
* GNU Affero General Public License for more details.
*
* You should have received a copy of the GNU Affero General Public License
* along with WAZebra.  If not, see <https://www.gnu.org/licenses/>.
*/

//! ZBC parser: category header lines followed by one clue per line.
//!
//! The header runs as long as lines match `name[+]: item, item, ...`; the
//! first line that does not switches to clue mode for good. Clues are
//! parsed by recursive descent into [`crate::ast`] nodes; every node gets a
//! dense id and a flag saying whether `$` occurs beneath it.

pub mod lexer;

use crate::ast::{
    ArithOp, BinaryOp, Clue, ClueKind, Expr, Ident, Membership, NaryOp, NodeId, RelOp, SetMember,
    Span,
};
use crate::error::Error;
use crate::puzzle::{Category, Puzzle};
use lexer::Token;

pub fn parse_source(source: &str) -> Result<Puzzle, Error> {
    let tokens = lexer::tokenize(source)?;
    Parser { tokens, pos: 0, next_id: 0 }.run()
}

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    next_id: NodeId,
}

impl Parser {
    fn run(mut self) -> Result<Puzzle, Error> {
        let mut categories: Vec<Category> = Vec::new();
        let mut clues = Vec::new();

        self.skip_newlines();
        while self.looks_like_header() {
            let category = self.parse_category()?;
            if categories.iter().any(|c| c.name == category.name) {
                return Err(self.syntax_at(
                    self.span(),
                    format!("category '{}' is defined twice", category.name),
                ));
            }
            categories.push(category);
            self.skip_newlines();
        }
        while !self.at_end() {
            let clue = self.parse_clue()?;
            self.expect_newline()?;
            clues.push(clue);
            self.skip_newlines();
        }

        Ok(Puzzle { categories, clues, node_count: self.next_id })
    }

    // --- Header ---

    /// Lookahead: does the current line match `name[+]: item, item, ...`?
    fn looks_like_header(&self) -> bool {
        let mut i = self.pos;
        let tok = |i: usize| self.tokens.get(i).map(|(t, _)| t);
        if !matches!(tok(i), Some(Token::Ident(_))) {
            return false;
        }
        i += 1;
        if matches!(tok(i), Some(Token::Plus)) {
            i += 1;
        }
        if !matches!(tok(i), Some(Token::Colon)) {
            return false;
        }
        i += 1;
        loop {
            if !matches!(tok(i), Some(Token::Ident(_) | Token::Number(_))) {
                return false;
            }
            i += 1;
            match tok(i) {
                Some(Token::Comma) => i += 1,
                Some(Token::Newline) | None => return true,
                _ => return false,
            }
        }
    }

    fn parse_category(&mut self) -> Result<Category, Error> {
        let (name, span) = match self.bump() {
            (Token::Ident(name), span) => (name, span),
            (token, span) => {
                return Err(self.syntax_at(span, format!("expected a category name, got {}", token.describe())));
            }
        };
        if name.contains('.') || name.starts_with('#') || name == "$" {
            return Err(self.syntax_at(span, format!("'{name}' is not a valid category name")));
        }
        let great = self.eat(&Token::Plus);
        self.expect(&Token::Colon)?;

        let mut items: Vec<String> = Vec::new();
        loop {
            let (token, span) = self.bump();
            let item = match token {
                Token::Ident(name) if !name.contains('.') && !name.starts_with('#') => name,
                Token::Number(n) => n.to_string(),
                token => {
                    return Err(self.syntax_at(span, format!("expected an item name, got {}", token.describe())));
                }
            };
            if items.contains(&item) {
                return Err(self.syntax_at(span, format!("item '{item}' is listed twice")));
            }
            items.push(item);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect_newline()?;
        Ok(Category { name, items, great })
    }

    // --- Clues, loosest binding first ---

    fn parse_clue(&mut self) -> Result<Clue, Error> {
        self.parse_iff()
    }

    fn parse_iff(&mut self) -> Result<Clue, Error> {
        let mut lhs = self.parse_implies()?;
        while self.eat(&Token::Iff) {
            let rhs = self.parse_implies()?;
            let span = lhs.span;
            lhs = self.node(span, ClueKind::Binary {
                op: BinaryOp::Iff,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    fn parse_implies(&mut self) -> Result<Clue, Error> {
        let lhs = self.parse_or()?;
        if self.eat(&Token::Implies) {
            let rhs = self.parse_implies()?;
            let span = lhs.span;
            return Ok(self.node(span, ClueKind::Binary {
                op: BinaryOp::Implies,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }));
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Clue, Error> {
        let first = self.parse_and()?;
        let mut operands = vec![first];
        while self.eat(&Token::Pipe) {
            operands.push(self.parse_and()?);
        }
        Ok(self.chain(operands, NaryOp::Or))
    }

    fn parse_and(&mut self) -> Result<Clue, Error> {
        let first = self.parse_xor()?;
        let mut operands = vec![first];
        while self.eat(&Token::Amp) {
            operands.push(self.parse_xor()?);
        }
        Ok(self.chain(operands, NaryOp::And))
    }

    /// Two operands make a plain binary node, three or more an n-ary one.
    fn chain(&mut self, mut operands: Vec<Clue>, op: NaryOp) -> Clue {
        match operands.len() {
            1 => operands.remove(0),
            2 => {
                let rhs = operands.pop().unwrap();
                let lhs = operands.pop().unwrap();
                let span = lhs.span;
                let binary = match op {
                    NaryOp::And => BinaryOp::And,
                    NaryOp::Or => BinaryOp::Or,
                };
                self.node(span, ClueKind::Binary {
                    op: binary,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                })
            }
            _ => {
                let span = operands[0].span;
                self.node(span, ClueKind::Nary { op, operands })
            }
        }
    }

    fn parse_xor(&mut self) -> Result<Clue, Error> {
        let mut lhs = self.parse_unary()?;
        while self.eat(&Token::Caret) {
            let rhs = self.parse_unary()?;
            let span = lhs.span;
            lhs = self.node(span, ClueKind::Binary {
                op: BinaryOp::Xor,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Clue, Error> {
        if let Some((Token::Not, span)) = self.peek_spanned() {
            let span = *span;
            self.bump();
            let child = self.parse_unary()?;
            return Ok(self.node(span, ClueKind::Not(Box::new(child))));
        }
        if self.eat(&Token::LParen) {
            let clue = self.parse_iff()?;
            self.expect(&Token::RParen)?;
            return Ok(clue);
        }
        self.parse_atom()
    }

    /// An atomic clue: positional, relational or membership.
    fn parse_atom(&mut self) -> Result<Clue, Error> {
        match self.peek() {
            Some(Token::Ident(_)) => {
                let term = self.term();
                match self.peek() {
                    Some(Token::Assign) => {
                        self.bump();
                        let rhs = self.positional_operand()?;
                        let span = term.span;
                        Ok(self.node(span, ClueKind::SamePosition(term, rhs)))
                    }
                    Some(Token::DoubleMinus) => {
                        self.bump();
                        let rhs = self.positional_operand()?;
                        let span = term.span;
                        Ok(self.node(span, ClueKind::Before(term, rhs)))
                    }
                    Some(Token::Minus) => {
                        self.bump();
                        let distance = self.offset_distance()?;
                        let rhs = self.positional_operand()?;
                        let span = term.span;
                        Ok(self.node(span, ClueKind::Offset { left: term, right: rhs, distance }))
                    }
                    Some(Token::Adjacent) => {
                        self.bump();
                        let rhs = self.positional_operand()?;
                        let span = term.span;
                        // `a _ b` is sugar for being a direct neighbour on
                        // either side.
                        let left = self.node(span, ClueKind::Offset {
                            left: term.clone(),
                            right: rhs.clone(),
                            distance: 1,
                        });
                        let right = self.node(span, ClueKind::Offset {
                            left: rhs,
                            right: term,
                            distance: 1,
                        });
                        Ok(self.node(span, ClueKind::Binary {
                            op: BinaryOp::Or,
                            lhs: Box::new(left),
                            rhs: Box::new(right),
                        }))
                    }
                    Some(Token::In) => {
                        self.bump();
                        let rhs = self.parse_membership()?;
                        let span = term.span;
                        Ok(self.node(span, ClueKind::In { lhs: SetMember::Item(term), rhs }))
                    }
                    Some(Token::Colon) => {
                        self.bump();
                        let category = self.category_name()?;
                        let value = Expr::Value { item: term, category };
                        let lhs = self.parse_expr_from(value)?;
                        self.finish_arithmetic_clue(lhs)
                    }
                    _ => Err(self.syntax_here(format!(
                        "expected an operator after '{}'",
                        term.name
                    ))),
                }
            }
            Some(Token::Number(_) | Token::Truths) => {
                let lhs = self.parse_expr()?;
                self.finish_arithmetic_clue(lhs)
            }
            _ => Err(self.syntax_here("expected a clue".to_string())),
        }
    }

    /// After a complete arithmetic expression, only a comparison or a
    /// membership test can follow.
    fn finish_arithmetic_clue(&mut self, lhs: Expr) -> Result<Clue, Error> {
        let span = self.span();
        match self.peek() {
            Some(Token::Eq) => self.relation(RelOp::Eq, lhs),
            Some(Token::Ne) => self.relation(RelOp::Ne, lhs),
            Some(Token::Lt) => self.relation(RelOp::Lt, lhs),
            Some(Token::Le) => self.relation(RelOp::Le, lhs),
            Some(Token::Gt) => self.relation(RelOp::Gt, lhs),
            Some(Token::Ge) => self.relation(RelOp::Ge, lhs),
            Some(Token::In) => {
                self.bump();
                let rhs = self.parse_membership()?;
                Ok(self.node(span, ClueKind::In { lhs: SetMember::Value(lhs), rhs }))
            }
            Some(Token::Assign | Token::DoubleMinus | Token::Adjacent) => {
                Err(Error::InvalidPositionalOperand { span })
            }
            _ => Err(self.syntax_at(span, "expected a comparison or 'in'".to_string())),
        }
    }

    fn relation(&mut self, op: RelOp, lhs: Expr) -> Result<Clue, Error> {
        let span = self.span();
        self.bump();
        let rhs = self.parse_expr()?;
        Ok(self.node(span, ClueKind::Relation { op, lhs, rhs }))
    }

    /// Optional explicit distance in `a -k- b`.
    fn offset_distance(&mut self) -> Result<usize, Error> {
        if let Some(Token::Number(n)) = self.peek() {
            if matches!(self.peek_at(1), Some(Token::Minus)) {
                let n = *n;
                let span = self.span();
                self.bump();
                self.bump();
                if n < 1 {
                    return Err(self.syntax_at(span, "offset distance must be at least 1".to_string()));
                }
                return Ok(n as usize);
            }
        }
        Ok(1)
    }

    fn positional_operand(&mut self) -> Result<Ident, Error> {
        match self.peek() {
            Some(Token::Ident(_)) => Ok(self.term()),
            _ => {
                let span = self.span();
                Err(Error::InvalidPositionalOperand { span })
            }
        }
    }

    // --- Arithmetic expressions ---

    fn parse_expr(&mut self) -> Result<Expr, Error> {
        let lhs = self.parse_product()?;
        self.parse_sum_rest(lhs)
    }

    /// Continues precedence climbing from an already-parsed factor.
    fn parse_expr_from(&mut self, first: Expr) -> Result<Expr, Error> {
        let lhs = self.parse_product_rest(first)?;
        self.parse_sum_rest(lhs)
    }

    fn parse_sum_rest(&mut self, mut lhs: Expr) -> Result<Expr, Error> {
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => ArithOp::Add,
                Some(Token::Minus) => ArithOp::Sub,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_product()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
    }

    fn parse_product(&mut self) -> Result<Expr, Error> {
        let first = self.parse_factor()?;
        self.parse_product_rest(first)
    }

    fn parse_product_rest(&mut self, mut lhs: Expr) -> Result<Expr, Error> {
        loop {
            let op = match self.peek() {
                Some(Token::Star) => ArithOp::Mul,
                Some(Token::Slash) => ArithOp::Div,
                Some(Token::Percent) => ArithOp::Rem,
                Some(Token::Diff) => ArithOp::Diff,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_factor()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
    }

    fn parse_factor(&mut self) -> Result<Expr, Error> {
        match self.peek() {
            Some(Token::Number(_)) => {
                if let (Token::Number(n), _) = self.bump() {
                    Ok(Expr::Number(n))
                } else {
                    unreachable!()
                }
            }
            Some(Token::Truths) => {
                let span = self.span();
                self.bump();
                self.expect(&Token::LParen)?;
                let mut members = vec![self.parse_clue()?];
                while self.eat(&Token::Comma) {
                    members.push(self.parse_clue()?);
                }
                self.expect(&Token::RParen)?;
                Ok(Expr::Truths { members, span })
            }
            Some(Token::LParen) => {
                self.bump();
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Ident(_)) => {
                let item = self.term();
                self.expect(&Token::Colon).map_err(|_| {
                    self.syntax_at(
                        item.span,
                        format!("'{}' needs ':category' to be used as a value", item.name),
                    )
                })?;
                let category = self.category_name()?;
                Ok(Expr::Value { item, category })
            }
            _ => Err(self.syntax_here("expected a value".to_string())),
        }
    }

    // --- Membership ---

    fn parse_membership(&mut self) -> Result<Membership, Error> {
        if self.eat(&Token::LBracket) {
            let lo = self.parse_expr()?;
            self.expect(&Token::Comma)?;
            let hi = self.parse_expr()?;
            self.expect(&Token::RBracket)?;
            return Ok(Membership::Range(Box::new(lo), Box::new(hi)));
        }
        self.expect(&Token::LParen)?;
        let mut members = vec![self.parse_set_member()?];
        while self.eat(&Token::Comma) {
            members.push(self.parse_set_member()?);
        }
        self.expect(&Token::RParen)?;
        Ok(Membership::Set(members))
    }

    fn parse_set_member(&mut self) -> Result<SetMember, Error> {
        if matches!(self.peek(), Some(Token::Ident(_)))
            && matches!(self.peek_at(1), Some(Token::Comma | Token::RParen))
        {
            return Ok(SetMember::Item(self.term()));
        }
        Ok(SetMember::Value(self.parse_expr()?))
    }

    // --- Node construction ---

    fn node(&mut self, span: Span, kind: ClueKind) -> Clue {
        let dynamic = kind_dynamic(&kind);
        let id = self.next_id;
        self.next_id += 1;
        Clue { id, span, dynamic, kind }
    }

    // --- Token plumbing ---

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|(t, _)| t)
    }

    fn peek_spanned(&self) -> Option<&(Token, Span)> {
        self.tokens.get(self.pos)
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, s)| *s)
            .unwrap_or(Span { line: 1, column: 1 })
    }

    fn bump(&mut self) -> (Token, Span) {
        let entry = self.tokens[self.pos].clone();
        self.pos += 1;
        entry
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Span, Error> {
        let span = self.span();
        if self.eat(expected) {
            Ok(span)
        } else {
            let found = self
                .peek()
                .map(|t| t.describe())
                .unwrap_or_else(|| "end of input".to_string());
            Err(self.syntax_at(span, format!("expected {}, got {found}", expected.describe())))
        }
    }

    fn expect_newline(&mut self) -> Result<(), Error> {
        if self.at_end() || self.eat(&Token::Newline) {
            Ok(())
        } else {
            let found = self.peek().map(|t| t.describe()).unwrap_or_default();
            Err(self.syntax_here(format!("expected end of line, got {found}")))
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(&Token::Newline) {}
    }

    /// Consumes an identifier token. Callers must have peeked.
    fn term(&mut self) -> Ident {
        match self.bump() {
            (Token::Ident(name), span) => Ident { name, span },
            _ => unreachable!("term() called without an identifier lookahead"),
        }
    }

    fn category_name(&mut self) -> Result<Ident, Error> {
        match self.peek() {
            Some(Token::Ident(name)) if !name.contains('.') => Ok(self.term()),
            _ => Err(self.syntax_here("expected a category name after ':'".to_string())),
        }
    }

    fn syntax_here(&self, message: String) -> Error {
        self.syntax_at(self.span(), message)
    }

    fn syntax_at(&self, span: Span, message: impl Into<String>) -> Error {
        Error::Syntax { message: message.into(), span }
    }
}

fn kind_dynamic(kind: &ClueKind) -> bool {
    match kind {
        ClueKind::Not(child) => child.dynamic,
        ClueKind::Binary { lhs, rhs, .. } => lhs.dynamic || rhs.dynamic,
        ClueKind::Nary { operands, .. } => operands.iter().any(|c| c.dynamic),
        ClueKind::Relation { lhs, rhs, .. } => expr_dynamic(lhs) || expr_dynamic(rhs),
        ClueKind::SamePosition(a, b) => a.is_dynamic() || b.is_dynamic(),
        ClueKind::Offset { left, right, .. } => left.is_dynamic() || right.is_dynamic(),
        ClueKind::Before(a, b) => a.is_dynamic() || b.is_dynamic(),
        ClueKind::In { lhs, rhs } => {
            let lhs = match lhs {
                SetMember::Item(ident) => ident.is_dynamic(),
                SetMember::Value(expr) => expr_dynamic(expr),
            };
            let rhs = match rhs {
                Membership::Set(members) => members.iter().any(|m| match m {
                    SetMember::Item(ident) => ident.is_dynamic(),
                    SetMember::Value(expr) => expr_dynamic(expr),
                }),
                Membership::Range(lo, hi) => expr_dynamic(lo) || expr_dynamic(hi),
            };
            lhs || rhs
        }
    }
}

fn expr_dynamic(expr: &Expr) -> bool {
    match expr {
        Expr::Number(_) => false,
        Expr::Value { item, category: _ } => item.is_dynamic(),
        Expr::Binary { lhs, rhs, .. } => expr_dynamic(lhs) || expr_dynamic(rhs),
        Expr::Truths { members, .. } => members.iter().any(|c| c.dynamic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Puzzle {
        parse_source(source).unwrap()
    }

    const HEADER: &str = "name: ann, bea, cy\npet+: cat, dog, fox, owl\n";

    #[test]
    fn header_lines_build_categories() {
        let puzzle = parse(HEADER);
        assert_eq!(puzzle.categories.len(), 2);
        assert!(!puzzle.categories[0].great);
        assert!(puzzle.categories[1].great);
        assert_eq!(puzzle.categories[1].items.len(), 4);
        assert!(puzzle.clues.is_empty());
    }

    #[test]
    fn numeric_items_are_allowed_in_headers() {
        let puzzle = parse("age: 10, 20, 30\n");
        assert_eq!(puzzle.categories[0].items, vec!["10", "20", "30"]);
    }

    #[test]
    fn first_non_header_line_switches_to_clues() {
        let source = format!("{HEADER}ann = cat\n");
        let puzzle = parse(&source);
        assert_eq!(puzzle.clues.len(), 1);
        assert!(matches!(puzzle.clues[0].kind, ClueKind::SamePosition(..)));
    }

    #[test]
    fn offset_distances_parse() {
        let source = format!("{HEADER}ann -2- bea\nann - bea\n");
        let puzzle = parse(&source);
        match (&puzzle.clues[0].kind, &puzzle.clues[1].kind) {
            (
                ClueKind::Offset { distance: first, .. },
                ClueKind::Offset { distance: second, .. },
            ) => {
                assert_eq!(*first, 2);
                assert_eq!(*second, 1);
            }
            other => panic!("expected offsets, got {other:?}"),
        }
    }

    #[test]
    fn adjacency_desugars_to_a_disjunction() {
        let source = format!("{HEADER}ann _ bea\n");
        let puzzle = parse(&source);
        match &puzzle.clues[0].kind {
            ClueKind::Binary { op: BinaryOp::Or, lhs, rhs } => {
                assert!(matches!(lhs.kind, ClueKind::Offset { distance: 1, .. }));
                assert!(matches!(rhs.kind, ClueKind::Offset { distance: 1, .. }));
            }
            other => panic!("expected a disjunction, got {other:?}"),
        }
    }

    #[test]
    fn long_chains_become_nary_nodes() {
        let source = format!("{HEADER}ann = cat | bea = cat | cy = cat\n");
        let puzzle = parse(&source);
        match &puzzle.clues[0].kind {
            ClueKind::Nary { op: NaryOp::Or, operands } => assert_eq!(operands.len(), 3),
            other => panic!("expected an n-ary or, got {other:?}"),
        }
    }

    #[test]
    fn dollar_marks_the_whole_clue_dynamic() {
        let source = format!("{HEADER}$ = ann => $:age in (10, 20)\n");
        let puzzle = parse(&source);
        assert!(puzzle.clues[0].dynamic);
    }

    #[test]
    fn relational_and_truths_clues_parse() {
        let source = format!("{HEADER}ann:pet in (cat, dog)\ntruths(ann = cat, bea = dog) == 1\n");
        let puzzle = parse(&source);
        assert!(matches!(puzzle.clues[0].kind, ClueKind::In { .. }));
        assert!(matches!(
            puzzle.clues[1].kind,
            ClueKind::Relation { op: RelOp::Eq, .. }
        ));
    }

    #[test]
    fn numbers_are_not_positional_operands() {
        let source = format!("{HEADER}ann = 3\n");
        match parse_source(&source) {
            Err(Error::InvalidPositionalOperand { span }) => assert_eq!(span.line, 3),
            other => panic!("expected a positional-operand error, got {other:?}"),
        }
    }

    #[test]
    fn node_ids_are_dense() {
        let source = format!("{HEADER}ann = cat & bea = dog\n");
        let puzzle = parse(&source);
        assert_eq!(puzzle.node_count, 3);
        let root = &puzzle.clues[0];
        assert_eq!(root.id, 2);
    }

    #[test]
    fn syntax_errors_carry_positions() {
        let source = format!("{HEADER}ann =\n");
        match parse_source(&source) {
            Err(Error::InvalidPositionalOperand { span }) => {
                assert_eq!(span.line, 3);
            }
            other => panic!("expected an error with a position, got {other:?}"),
        }
    }
}
