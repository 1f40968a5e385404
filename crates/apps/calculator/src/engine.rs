use std::str::FromStr;

use thiserror::Error;

const MAX_ENTRY_DIGITS: usize = 16;
const MAX_PLAIN_DISPLAY_CHARS: usize = 12;
const NEAR_ZERO: f64 = 1e-10;

/// Text shown on the display after a failed operation.
pub const ERROR_DISPLAY: &str = "Error";

/// Failure of a single arithmetic step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The right-hand operand of a division was zero.
    #[error("cannot divide by zero")]
    DivideByZero,
    /// An operand or the result was NaN or infinite.
    #[error("result is not a finite number")]
    NotFinite,
    /// An operator symbol outside `+ − × ÷` (and their ASCII aliases).
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),
}

/// Binary operator keys on the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    /// Keypad label for the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }
}

impl FromStr for BinaryOp {
    type Err = CalcError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol {
            "+" => Ok(Self::Add),
            "−" | "-" => Ok(Self::Subtract),
            "×" | "*" | "x" | "X" => Ok(Self::Multiply),
            "÷" | "/" => Ok(Self::Divide),
            other => Err(CalcError::UnknownOperator(other.to_string())),
        }
    }
}

/// Input events understood by [`CalculatorState::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalcAction {
    Digit(char),
    Decimal,
    Backspace,
    ClearAll,
    ToggleSign,
    Percent,
    Binary(BinaryOp),
    Equals,
}

/// Applies `op` to the operands.
///
/// Results whose magnitude is below `1e-10` are snapped to zero to hide floating-point residue.
///
/// # Errors
///
/// Returns [`CalcError::DivideByZero`] for a zero divisor and [`CalcError::NotFinite`] when an
/// operand or the result is NaN or infinite.
pub fn compute(lhs: f64, rhs: f64, op: BinaryOp) -> Result<f64, CalcError> {
    if !lhs.is_finite() || !rhs.is_finite() {
        return Err(CalcError::NotFinite);
    }
    let result = match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Subtract => lhs - rhs,
        BinaryOp::Multiply => lhs * rhs,
        BinaryOp::Divide => {
            if rhs == 0.0 {
                return Err(CalcError::DivideByZero);
            }
            lhs / rhs
        }
    };

    if !result.is_finite() {
        return Err(CalcError::NotFinite);
    }
    if result.abs() < NEAR_ZERO {
        return Ok(0.0);
    }
    Ok(result)
}

/// Formats a value for the display.
///
/// Fractions are rounded to 12 decimal places with trailing zeros trimmed, so `0.1 + 0.2` shows
/// as `0.3`. Anything longer than 12 characters switches to exponent notation with six fraction
/// digits.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let plain = if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let mut text = format!("{value:.12}");
        while text.contains('.') && text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    };

    if plain.chars().count() <= MAX_PLAIN_DISPLAY_CHARS {
        return plain;
    }

    let scientific = format!("{value:.6e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => scientific,
    }
}

/// Keypad state machine: one entry being typed plus an optional pending operation.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorState {
    entry: String,
    /// Unrounded value behind `entry` when the entry shows a computed result.
    exact: Option<f64>,
    accumulator: Option<f64>,
    pending_op: Option<BinaryOp>,
    waiting_for_operand: bool,
    error: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            entry: "0".to_string(),
            exact: None,
            accumulator: None,
            pending_op: None,
            waiting_for_operand: false,
            error: false,
        }
    }
}

impl CalculatorState {
    pub fn apply(&mut self, action: CalcAction) {
        match action {
            CalcAction::Digit(digit) => self.input_digit(digit),
            CalcAction::Decimal => self.input_decimal(),
            CalcAction::Backspace => self.backspace(),
            CalcAction::ClearAll => *self = Self::default(),
            CalcAction::ToggleSign => self.toggle_sign(),
            CalcAction::Percent => self.percent(),
            CalcAction::Binary(op) => self.set_pending_operation(op),
            CalcAction::Equals => self.equals(),
        }
    }

    pub fn display_text(&self) -> String {
        if self.error {
            ERROR_DISPLAY.to_string()
        } else {
            self.entry.clone()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Operator waiting for its right-hand operand, used to highlight the key.
    pub fn pending_op(&self) -> Option<BinaryOp> {
        self.pending_op
    }

    fn current_value(&self) -> f64 {
        self.exact
            .unwrap_or_else(|| self.entry.parse::<f64>().unwrap_or(0.0))
    }

    fn show_result(&mut self, value: f64) {
        self.entry = format_number(value);
        self.exact = Some(value);
    }

    fn input_digit(&mut self, digit: char) {
        if self.error {
            *self = Self::default();
        }

        if self.waiting_for_operand {
            self.entry = digit.to_string();
            self.exact = None;
            self.waiting_for_operand = false;
            return;
        }

        let digits_only = self.entry.chars().filter(|c| c.is_ascii_digit()).count();
        if digits_only >= MAX_ENTRY_DIGITS {
            return;
        }

        self.exact = None;
        match self.entry.as_str() {
            "0" => self.entry = digit.to_string(),
            "-0" => self.entry = format!("-{digit}"),
            _ => self.entry.push(digit),
        }
    }

    fn input_decimal(&mut self) {
        if self.error {
            *self = Self::default();
        }
        if self.waiting_for_operand {
            self.entry = "0.".to_string();
            self.exact = None;
            self.waiting_for_operand = false;
            return;
        }
        self.exact = None;
        if !self.entry.contains('.') {
            self.entry.push('.');
        }
    }

    fn backspace(&mut self) {
        if self.error {
            *self = Self::default();
            return;
        }
        if self.waiting_for_operand {
            return;
        }
        self.exact = None;
        self.entry.pop();
        if self.entry.is_empty() || self.entry == "-" {
            self.entry = "0".to_string();
        }
    }

    fn toggle_sign(&mut self) {
        if self.error || self.current_value() == 0.0 {
            return;
        }
        self.exact = self.exact.map(|value| -value);
        if let Some(stripped) = self.entry.strip_prefix('-') {
            self.entry = stripped.to_string();
        } else {
            self.entry.insert(0, '-');
        }
    }

    fn percent(&mut self) {
        if self.error {
            return;
        }
        let value = self.current_value() / 100.0;
        if !value.is_finite() {
            self.set_error();
            return;
        }
        self.show_result(value);
    }

    fn set_pending_operation(&mut self, op: BinaryOp) {
        if self.error {
            return;
        }

        // Chain only once the second operand has been typed; otherwise the key replaces the
        // pending operator.
        if let (Some(acc), Some(pending)) = (self.accumulator, self.pending_op) {
            if !self.waiting_for_operand {
                match compute(acc, self.current_value(), pending) {
                    Ok(result) => {
                        self.show_result(result);
                        self.accumulator = Some(result);
                    }
                    Err(_) => {
                        self.set_error();
                        return;
                    }
                }
            }
        } else {
            self.accumulator = Some(self.current_value());
        }

        self.pending_op = Some(op);
        self.waiting_for_operand = true;
    }

    fn equals(&mut self) {
        if self.error {
            return;
        }
        let (Some(acc), Some(op)) = (self.accumulator, self.pending_op) else {
            return;
        };

        match compute(acc, self.current_value(), op) {
            Ok(result) => {
                self.show_result(result);
                self.accumulator = None;
                self.pending_op = None;
                self.waiting_for_operand = true;
            }
            Err(_) => self.set_error(),
        }
    }

    fn set_error(&mut self) {
        self.entry = "0".to_string();
        self.exact = None;
        self.accumulator = None;
        self.pending_op = None;
        self.waiting_for_operand = false;
        self.error = true;
    }
}

pub fn keyboard_action(key: &str) -> Option<CalcAction> {
    match key {
        "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
            key.chars().next().map(CalcAction::Digit)
        }
        "." | "," => Some(CalcAction::Decimal),
        "%" => Some(CalcAction::Percent),
        "=" | "Enter" => Some(CalcAction::Equals),
        "Backspace" => Some(CalcAction::Backspace),
        "Escape" | "Delete" | "c" | "C" => Some(CalcAction::ClearAll),
        "F9" => Some(CalcAction::ToggleSign),
        other => other.parse::<BinaryOp>().ok().map(CalcAction::Binary),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn apply_all(state: &mut CalculatorState, actions: &[CalcAction]) {
        for action in actions {
            state.apply(*action);
        }
    }

    fn enter_number(state: &mut CalculatorState, text: &str) {
        for ch in text.chars() {
            match ch {
                '0'..='9' => state.apply(CalcAction::Digit(ch)),
                '.' => state.apply(CalcAction::Decimal),
                _ => panic!("unsupported test char: {ch}"),
            }
        }
    }

    fn op(symbol: &str) -> CalcAction {
        CalcAction::Binary(symbol.parse().expect("known operator"))
    }

    #[test]
    fn compute_rejects_division_by_zero() {
        let divide: BinaryOp = "÷".parse().expect("divide");
        assert_eq!(compute(6.0, 0.0, divide), Err(CalcError::DivideByZero));
        assert_eq!(compute(f64::NAN, 1.0, BinaryOp::Add), Err(CalcError::NotFinite));
        assert_eq!(
            compute(f64::MAX, f64::MAX, BinaryOp::Multiply),
            Err(CalcError::NotFinite)
        );
    }

    #[test]
    fn compute_snaps_floating_residue_and_formats_cleanly() {
        let sum = compute(0.1, 0.2, BinaryOp::Add).expect("sum");
        assert_eq!(format_number(sum), "0.3");

        let residue = compute(0.3, 0.1 + 0.2, BinaryOp::Subtract).expect("difference");
        assert_eq!(residue, 0.0);
        assert_eq!(format_number(residue), "0");
    }

    #[test]
    fn format_number_switches_to_exponent_past_twelve_chars() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(123_456_789_012.0), "123456789012");
        assert_eq!(format_number(1_234_567_890_123.0), "1.234568e+12");
        assert_eq!(format_number(0.000_012_345_678_9), "1.234568e-5");
    }

    #[test]
    fn operator_symbols_parse_with_ascii_aliases() {
        assert_eq!("−".parse::<BinaryOp>(), Ok(BinaryOp::Subtract));
        assert_eq!("-".parse::<BinaryOp>(), Ok(BinaryOp::Subtract));
        assert_eq!("*".parse::<BinaryOp>(), Ok(BinaryOp::Multiply));
        assert_eq!(
            "^".parse::<BinaryOp>(),
            Err(CalcError::UnknownOperator("^".to_string()))
        );
    }

    #[test]
    fn keypad_evaluates_simple_expression() {
        let mut state = CalculatorState::default();
        apply_all(
            &mut state,
            &[
                CalcAction::Digit('2'),
                op("+"),
                CalcAction::Digit('3'),
                CalcAction::Equals,
            ],
        );
        assert_eq!(state.display_text(), "5");
        assert_eq!(state.pending_op(), None);
    }

    #[test]
    fn keypad_chains_operations_left_to_right() {
        let mut state = CalculatorState::default();
        apply_all(
            &mut state,
            &[
                CalcAction::Digit('2'),
                op("+"),
                CalcAction::Digit('3'),
                op("×"),
            ],
        );
        assert_eq!(state.display_text(), "5");
        apply_all(&mut state, &[CalcAction::Digit('4'), CalcAction::Equals]);
        assert_eq!(state.display_text(), "20");
    }

    #[test]
    fn chained_results_keep_full_precision_behind_the_display() {
        let mut state = CalculatorState::default();
        enter_number(&mut state, "1234567891");
        apply_all(&mut state, &[op("×")]);
        enter_number(&mut state, "1000");
        apply_all(&mut state, &[CalcAction::Equals]);
        assert!(state.display_text().contains('e'));

        apply_all(&mut state, &[op("−")]);
        enter_number(&mut state, "1234567890000");
        apply_all(&mut state, &[CalcAction::Equals]);
        assert_eq!(state.display_text(), "1000");
    }

    #[test]
    fn operator_can_be_replaced_before_second_operand() {
        let mut state = CalculatorState::default();
        apply_all(
            &mut state,
            &[
                CalcAction::Digit('9'),
                op("+"),
                op("−"),
                CalcAction::Digit('4'),
                CalcAction::Equals,
            ],
        );
        assert_eq!(state.display_text(), "5");
    }

    #[test]
    fn division_by_zero_shows_error_and_next_digit_recovers() {
        let mut state = CalculatorState::default();
        apply_all(
            &mut state,
            &[
                CalcAction::Digit('6'),
                op("÷"),
                CalcAction::Digit('0'),
                CalcAction::Equals,
            ],
        );
        assert_eq!(state.display_text(), ERROR_DISPLAY);
        assert!(state.is_error());

        state.apply(op("+"));
        assert_eq!(state.display_text(), ERROR_DISPLAY);

        state.apply(CalcAction::Digit('7'));
        assert_eq!(state.display_text(), "7");
        assert!(!state.is_error());
    }

    #[test]
    fn decimal_entry_and_float_cleanup() {
        let mut state = CalculatorState::default();
        enter_number(&mut state, "0.1");
        state.apply(op("+"));
        enter_number(&mut state, "0.2");
        state.apply(CalcAction::Equals);
        assert_eq!(state.display_text(), "0.3");

        state.apply(CalcAction::Decimal);
        assert_eq!(state.display_text(), "0.");
        state.apply(CalcAction::Decimal);
        assert_eq!(state.display_text(), "0.");
    }

    #[test]
    fn sign_percent_and_clear() {
        let mut state = CalculatorState::default();
        state.apply(CalcAction::ToggleSign);
        assert_eq!(state.display_text(), "0");

        enter_number(&mut state, "50");
        state.apply(CalcAction::ToggleSign);
        assert_eq!(state.display_text(), "-50");
        state.apply(CalcAction::Percent);
        assert_eq!(state.display_text(), "-0.5");
        state.apply(CalcAction::ToggleSign);
        assert_eq!(state.display_text(), "0.5");

        state.apply(CalcAction::ClearAll);
        assert_eq!(state, CalculatorState::default());
    }

    #[test]
    fn entry_length_is_capped_and_backspace_trims() {
        let mut state = CalculatorState::default();
        for _ in 0..(MAX_ENTRY_DIGITS + 4) {
            state.apply(CalcAction::Digit('9'));
        }
        assert_eq!(state.display_text().len(), MAX_ENTRY_DIGITS);

        state.apply(CalcAction::ClearAll);
        enter_number(&mut state, "12");
        state.apply(CalcAction::Backspace);
        state.apply(CalcAction::Backspace);
        assert_eq!(state.display_text(), "0");
    }

    #[test]
    fn keyboard_action_maps_supported_keys() {
        assert_eq!(keyboard_action("7"), Some(CalcAction::Digit('7')));
        assert_eq!(keyboard_action("/"), Some(op("÷")));
        assert_eq!(keyboard_action("x"), Some(op("×")));
        assert_eq!(keyboard_action("Enter"), Some(CalcAction::Equals));
        assert_eq!(keyboard_action("Escape"), Some(CalcAction::ClearAll));
        assert_eq!(keyboard_action("%"), Some(CalcAction::Percent));
        assert_eq!(keyboard_action("nope"), None);
    }
}
