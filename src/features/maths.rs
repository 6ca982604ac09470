//! Keypad calculator solving two-step linear equations `y = mx ± b`

use crate::chat::{Button, ButtonStyle, Component, ControlSet, InteractionEvent, Outbound, UserId};
use crate::commands::{Command, Invocation};
use crate::context::CommandContext;
use crate::error::BotError;
use crate::ui::{DisplayUnit, InteractionGate, InteractiveView, ViewUpdate, launch};
use crate::utils::format_number;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// Mathematical italic x, shown in place of the variable
pub const X: &str = "\u{1d465}";
const DEL: &str = "DEL";
const ENTER: &str = "Enter";
const BLANK: &str = "\u{200b}";
const KEY_PREFIX: &str = "pad:";

const TITLE: &str = "Linear Equation Calculator";
const PROMPT: &str = "Use the following buttons to input an equation in the format of: `y = mx + b`\nExample: `8 = 5x + 3`\nI will solve for `x`";

/// `y=mx+b` or `y=mx-b` with signed decimal terms, anchored at the start
static EQUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-+]?\d+\.?\d*)=([-+]?\d+\.?\d*)x(\+|-)([-+]?\d+\.?\d*)")
        .expect("Equation pattern should be valid")
});

/// A solved equation and the steps that led there
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub m: f64,
    pub b: f64,
    pub y: f64,
    pub x: f64,
    pub steps: String,
}

/// Solves `y=mx+b` or `y=mx-b` for x, whitespace ignored
pub fn solve_linear(equation: &str) -> Result<Solution, BotError> {
    let invalid = || BotError::InvalidEquation(equation.to_string());
    let compact: String = equation.chars().filter(|c| !c.is_whitespace()).collect();

    let terms = EQUATION.captures(&compact).ok_or_else(invalid)?;
    let number = |index: usize| -> Result<f64, BotError> {
        terms
            .get(index)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(invalid)
    };

    let y = number(1)?;
    let m = number(2)?;
    let b = if &terms[3] == "-" { -number(4)? } else { number(4)? };
    if m == 0.0 {
        return Err(invalid());
    }

    let mx = y - b;
    let x = mx / m;

    let (m_s, y_s) = (format_number(m), format_number(y));
    let isolate = if b > 0.0 {
        format!("{m_s}{X} = {y_s} - {}", format_number(b))
    } else if b < 0.0 {
        format!("{m_s}{X} = {y_s} + {}", format_number(b.abs()))
    } else {
        format!("{m_s}{X} = {y_s}")
    };
    let steps = format!(
        "{equation}\n{isolate}\n{X} = {} / {m_s}\n{X} = {}",
        format_number(mx),
        format_number(x)
    );

    Ok(Solution { m, b, y, x, steps })
}

/// Keypad view building an equation one key at a time
pub struct LinearPad {
    gate: InteractionGate,
    equation: String,
    touched: bool,
}

impl LinearPad {
    pub fn new(owner: UserId) -> Self {
        Self {
            gate: InteractionGate::new(owner),
            equation: String::new(),
            touched: false,
        }
    }

    pub fn equation(&self) -> &str {
        &self.equation
    }

    fn key(label: &str, style: ButtonStyle) -> Component {
        Component::Button(Button::new(format!("{KEY_PREFIX}{label}"), label, style))
    }

    fn blank(slot: usize) -> Component {
        Component::Button(
            Button::new(format!("{KEY_PREFIX}blank{slot}"), BLANK, ButtonStyle::Gray).disabled(true),
        )
    }

    fn keypad() -> ControlSet {
        use ButtonStyle::{Blurple, Gray, Green, Red};
        ControlSet::new()
            .with_row(vec![
                Self::key("1", Gray),
                Self::key("2", Gray),
                Self::key("3", Gray),
                Self::key("+", Red),
                Self::key(DEL, Red),
            ])
            .with_row(vec![
                Self::key("4", Gray),
                Self::key("5", Gray),
                Self::key("6", Gray),
                Self::key("-", Red),
                Self::blank(1),
            ])
            .with_row(vec![
                Self::key("7", Gray),
                Self::key("8", Gray),
                Self::key("9", Gray),
                Self::key(X, Blurple),
                Self::blank(2),
            ])
            .with_row(vec![
                Self::key(".", Gray),
                Self::key("0", Gray),
                Self::key("=", Blurple),
                Self::key(ENTER, Green),
                Self::blank(3),
            ])
    }

    fn prompt(&self) -> DisplayUnit {
        let mut description = PROMPT.to_string();
        if self.touched {
            let shown = self.equation.replace('x', X);
            let shown = if shown.is_empty() { BLANK.to_string() } else { shown };
            description.push_str(&format!("\n\n```py\n{}\n```", shown));
        }
        DisplayUnit::with_description(description).titled(TITLE)
    }

    fn solve(&self) -> Outbound {
        match solve_linear(&self.equation) {
            Ok(solution) => Outbound::embed(
                DisplayUnit::with_description(format!("```py\n{}\n```", solution.steps))
                    .titled("Solution:"),
            ),
            Err(e) => Outbound::text(e.to_string()),
        }
    }
}

#[async_trait]
impl InteractiveView for LinearPad {
    fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    fn render(&self) -> Outbound {
        Outbound::embed(self.prompt()).with_controls(Self::keypad())
    }

    async fn handle(&mut self, event: &InteractionEvent) -> Result<ViewUpdate, BotError> {
        let Some(key) = event.component_id.strip_prefix(KEY_PREFIX) else {
            return Ok(ViewUpdate::Unchanged);
        };

        match key {
            ENTER => return Ok(ViewUpdate::Finish(self.solve())),
            DEL => {
                self.equation.pop();
            }
            X => self.equation.push('x'),
            "+" | "-" | "=" | "." => self.equation.push_str(key),
            digit if digit.len() == 1 && digit.chars().all(|c| c.is_ascii_digit()) => {
                self.equation.push_str(digit)
            }
            _ => return Ok(ViewUpdate::Unchanged),
        }

        self.touched = true;
        Ok(ViewUpdate::Edit(self.render()))
    }

    fn expire(&mut self) -> Option<Outbound> {
        let mut controls = Self::keypad();
        controls.disable_all();
        Some(Outbound::embed(self.prompt()).with_controls(controls))
    }
}

/// `linears`: open the linear equation keypad
pub struct LinearCalculator;

#[async_trait]
impl Command for LinearCalculator {
    fn name(&self) -> &'static str {
        "linears"
    }

    fn summary(&self) -> &'static str {
        "Solve y = mx + b for x with a keypad"
    }

    async fn run(&self, ctx: &CommandContext, _invocation: &Invocation) -> Result<(), BotError> {
        let pad = LinearPad::new(ctx.author);
        let timeout = Some(ctx.app.config.calculator_timeout());
        launch(&ctx.app, ctx.channel, None, pad, timeout).await?;
        Ok(())
    }
}
