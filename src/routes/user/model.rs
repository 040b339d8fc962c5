use serde::Serialize;

use crate::forms::validator::{EMAIL_RX, matches, min_chars, not_blank};
use crate::forms::{Field, FormRecord, Validator};

pub const MIN_PASSWORD_CHARS: usize = 8;

const BLANK: &str = "This field cannot be blank";
const BAD_EMAIL: &str = "This field must be a valid email address";

#[derive(Debug, Default, Serialize)]
pub struct UserSignupForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub validator: Validator,
}

impl FormRecord for UserSignupForm {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::text("name", "name", |f: &mut Self| &mut f.name),
            Field::text("email", "email", |f: &mut Self| &mut f.email),
            Field::text("password", "password", |f: &mut Self| &mut f.password),
        ]
    }
}

impl UserSignupForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.name), "name", BLANK);
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(matches(&self.email, &EMAIL_RX), "email", BAD_EMAIL);
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.check_field(
            min_chars(&self.password, MIN_PASSWORD_CHARS),
            "password",
            "This field must be at least 8 characters long",
        );
        v.valid()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct UserLoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub validator: Validator,
}

impl FormRecord for UserLoginForm {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::text("email", "email", |f: &mut Self| &mut f.email),
            Field::text("password", "password", |f: &mut Self| &mut f.password),
        ]
    }
}

impl UserLoginForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(matches(&self.email, &EMAIL_RX), "email", BAD_EMAIL);
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.valid()
    }
}
