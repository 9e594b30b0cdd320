/// Pass 3: struct acyclicity. A struct that contains itself by value has
/// no finite size; pointers break the chain since they are indirection.
use super::{Checker, CheckerErrorKind};
use crate::ast::{DeclKind, StructId, StructMember};
use crate::token::TokenKind;

impl<'a> Checker<'a> {
    pub(crate) fn check_struct_cycles(&mut self) {
        let decs = self.program.decs.clone();
        for dec_id in decs {
            let DeclKind::Struct(dec) = self.ast[dec_id].kind else {
                continue;
            };
            if !self.ast[dec].checked {
                let mut chain = Vec::new();
                self.visit_struct(dec, &mut chain);
            }
        }
    }

    /// DFS over value-typed fields. `chain` holds the structs on the
    /// current search path; finding a chain member again is a cycle, and
    /// the `checked` bit keeps the whole pass O(structs + fields).
    fn visit_struct(&mut self, dec: StructId, chain: &mut Vec<StructId>) {
        chain.push(dec);
        let members = self.ast[dec].members.clone();
        for member in members {
            let StructMember::Var(var) = member else {
                continue;
            };
            let field_name = self.ast[var].name;
            let ty = self.ast[var].ty.clone();
            // A leading reference is transparent; a pointer anywhere up
            // front means the field does not contribute to the size.
            let mut head = 0;
            if ty.tokens[head].kind == TokenKind::Reference {
                head += 1;
            }
            match ty.tokens.get(head) {
                Some(tok) if tok.kind == TokenKind::Identifier => {}
                _ => continue,
            }
            let Some(target_dec) = ty.resolved else {
                continue;
            };
            let DeclKind::Struct(target) = self.ast[target_dec].kind else {
                continue;
            };
            if self.ast[target].checked {
                continue;
            }
            if chain.contains(&target) {
                // Only the back-edge target is marked; one report per
                // entry into a cycle.
                self.error_related(CheckerErrorKind::StructCycle, field_name, target_dec);
                self.ast[target].has_cycle = true;
            } else {
                self.visit_struct(target, chain);
            }
        }
        self.ast[dec].checked = true;
        chain.pop();
    }
}
