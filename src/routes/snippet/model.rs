use serde::Serialize;

use crate::forms::validator::{max_chars, not_blank, permitted_value};
use crate::forms::{Field, FormRecord, Validator};
use crate::models::snippet::PERMITTED_LIFETIMES;

pub const MAX_TITLE_CHARS: usize = 100;

#[derive(Debug, Default, Serialize)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: i64,
    pub validator: Validator,
}

impl FormRecord for SnippetCreateForm {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::text("title", "title", |f: &mut Self| &mut f.title),
            Field::text("content", "content", |f: &mut Self| &mut f.content),
            Field::integer("expires", "expires", |f: &mut Self| &mut f.expires),
        ]
    }
}

impl SnippetCreateForm {
    /// 新建表单默认有效期为一年
    pub fn new() -> Self {
        Self {
            expires: 365,
            ..Default::default()
        }
    }

    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.title), "title", "This field cannot be blank");
        v.check_field(
            max_chars(&self.title, MAX_TITLE_CHARS),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(not_blank(&self.content), "content", "This field cannot be blank");
        v.check_field(
            permitted_value(&self.expires, &PERMITTED_LIFETIMES),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v.valid()
    }
}
