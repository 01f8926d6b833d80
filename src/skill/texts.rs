//! Fixed phrases and button sets the skill speaks.

use super::protocol::Button;

/// Greeting for a new session.
pub const START_TEXT: &str = "Приветсвую тебя дорогой пользователь! Я - диаботик, я помогу \
     тебе определить, есть ли у тебя предрасположенность к диабету. Желаете начать?";

/// Reply to the help keyword.
pub const HELP_TEXT: &str =
    "Я помогу тебе определить, есть ли у тебя предрасположенность к диабету";

/// Reply when none of the keywords were recognized.
pub const FALLBACK_TEXT: &str = "Что-то я не могу понять, что именно ты имеешь ввиду. \
     Повтори пожалуйста, желаешь начать?";

/// Reply when the user declines.
pub const FAREWELL_TEXT: &str = "До встречи!";

pub const DIABETES_TRUE_TEXT: &str = "У вас есть предрасположенность к диабету";
pub const DIABETES_FALSE_TEXT: &str = "У вас нет предрасположенности к диабету";

/// Appended after a prediction result.
pub const RESTART_TEXT: &str = "Желаете продолжить?";

pub const HELP_BUTTON: &str = "Помощь";
pub const YES_BUTTON: &str = "Да";
pub const NO_BUTTON: &str = "Нет";

/// Help / Yes / No.
pub fn standard_buttons() -> Vec<Button> {
    [HELP_BUTTON, YES_BUTTON, NO_BUTTON]
        .into_iter()
        .map(Button::hidden)
        .collect()
}

/// Help only, shown after an unrecognized utterance.
pub fn reduced_buttons() -> Vec<Button> {
    vec![Button::hidden(HELP_BUTTON)]
}

/// Result sentence followed by the restart prompt.
pub fn prediction_text(predisposed: bool) -> String {
    let result = if predisposed {
        DIABETES_TRUE_TEXT
    } else {
        DIABETES_FALSE_TEXT
    };
    format!("{result}. {RESTART_TEXT}")
}
