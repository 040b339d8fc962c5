//! 表单解码
//!
//! 每种表单记录通过 [`FormRecord::fields`] 声明字段映射表（字段名、提交键、
//! 解析方式），解码时逐项应用，不依赖运行时反射。

pub mod validator;

use std::collections::HashSet;

pub use validator::Validator;

/// 字段的解析方式及其写入位置
pub enum Binding<T> {
    Text(fn(&mut T) -> &mut String),
    Integer(fn(&mut T) -> &mut i64),
}

pub struct Field<T> {
    pub name: &'static str,
    pub key: &'static str,
    pub binding: Binding<T>,
}

impl<T> Field<T> {
    pub fn text(name: &'static str, key: &'static str, target: fn(&mut T) -> &mut String) -> Self {
        Self {
            name,
            key,
            binding: Binding::Text(target),
        }
    }

    pub fn integer(name: &'static str, key: &'static str, target: fn(&mut T) -> &mut i64) -> Self {
        Self {
            name,
            key,
            binding: Binding::Integer(target),
        }
    }
}

/// 可由提交数据解码的表单记录
pub trait FormRecord: Default {
    fn fields() -> Vec<Field<Self>>;
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// 客户端提交的值无法解析
    #[error("malformed value {value:?} for field {field}")]
    Malformed { field: &'static str, value: String },
    /// 字段映射表本身有误，属于程序缺陷
    #[error("invalid decode target: {0}")]
    InvalidTarget(String),
}

/// 将提交的键值对解码为表单记录
///
/// 同一个键出现多次时取第一个值；缺失的键保持字段默认值。
pub fn decode<T: FormRecord>(pairs: &[(String, String)]) -> Result<T, FormError> {
    let fields = T::fields();
    check_fields(&fields)?;

    let mut record = T::default();
    for field in &fields {
        let Some(value) = pairs
            .iter()
            .find(|(key, _)| key == field.key)
            .map(|(_, value)| value)
        else {
            continue;
        };

        match field.binding {
            Binding::Text(target) => *target(&mut record) = value.clone(),
            Binding::Integer(target) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    continue;
                }
                *target(&mut record) =
                    trimmed.parse().map_err(|_| FormError::Malformed {
                        field: field.name,
                        value: value.clone(),
                    })?;
            }
        }
    }

    Ok(record)
}

fn check_fields<T>(fields: &[Field<T>]) -> Result<(), FormError> {
    if fields.is_empty() {
        return Err(FormError::InvalidTarget(
            "form record declares no fields".into(),
        ));
    }

    let mut names = HashSet::new();
    let mut keys = HashSet::new();
    for field in fields {
        if !names.insert(field.name) {
            return Err(FormError::InvalidTarget(format!(
                "field {} is declared more than once",
                field.name
            )));
        }
        if !keys.insert(field.key) {
            return Err(FormError::InvalidTarget(format!(
                "submission key {} is mapped more than once",
                field.key
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct NoteForm {
        title: String,
        priority: i64,
    }

    impl FormRecord for NoteForm {
        fn fields() -> Vec<Field<Self>> {
            vec![
                Field::text("title", "title", |f: &mut Self| &mut f.title),
                Field::integer("priority", "priority", |f: &mut Self| &mut f.priority),
            ]
        }
    }

    #[derive(Debug, Default)]
    struct ClashingForm {
        a: String,
        b: String,
    }

    impl FormRecord for ClashingForm {
        fn fields() -> Vec<Field<Self>> {
            vec![
                Field::text("a", "value", |f: &mut Self| &mut f.a),
                Field::text("b", "value", |f: &mut Self| &mut f.b),
            ]
        }
    }

    #[derive(Debug, Default)]
    struct EmptyForm;

    impl FormRecord for EmptyForm {
        fn fields() -> Vec<Field<Self>> {
            Vec::new()
        }
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn decodes_text_and_integer_fields() {
        let form: NoteForm = decode(&pairs(&[("title", "Hello"), ("priority", " 7 ")])).unwrap();

        assert_eq!(form.title, "Hello");
        assert_eq!(form.priority, 7);
    }

    #[test]
    fn first_value_wins_and_unknown_keys_are_ignored() {
        let form: NoteForm = decode(&pairs(&[
            ("title", "first"),
            ("title", "second"),
            ("extra", "ignored"),
        ]))
        .unwrap();

        assert_eq!(form.title, "first");
        assert_eq!(form.priority, 0);
    }

    #[test]
    fn non_numeric_integer_is_a_client_error() {
        let err = decode::<NoteForm>(&pairs(&[("priority", "seven")])).unwrap_err();

        assert!(matches!(err, FormError::Malformed { field: "priority", .. }));
    }

    #[test]
    fn empty_integer_keeps_default() {
        let form: NoteForm = decode(&pairs(&[("priority", "")])).unwrap();
        assert_eq!(form.priority, 0);
    }

    #[test]
    fn clashing_mapping_is_an_invalid_target() {
        let err = decode::<ClashingForm>(&pairs(&[("value", "x")])).unwrap_err();
        assert!(matches!(err, FormError::InvalidTarget(_)));
    }

    #[test]
    fn empty_mapping_is_an_invalid_target() {
        let err = decode::<EmptyForm>(&[]).unwrap_err();
        assert!(matches!(err, FormError::InvalidTarget(_)));
    }
}
