// 👤 Person Records
// Employees carry {salary, sales}, customers carry {purchases, phone}.

use super::TypedRecord;
use crate::dispatch::{require_f64, require_i64, require_string, require_u32, FieldPair, Key, Shape};
use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

const ID: Key = Key::new("id");
const FIRST_NAME: Key = Key::aliased("firstName", &["nombre"]);
const LAST_NAME: Key = Key::aliased("lastName", &["apellido"]);
const AGE: Key = Key::aliased("age", &["edad"]);
const SALARY: Key = Key::aliased("salary", &["sueldo"]);
const SALES: Key = Key::aliased("sales", &["ventas"]);
const PURCHASES: Key = Key::aliased("purchases", &["compras"]);
const PHONE: Key = Key::aliased("phone", &["telefono"]);

const PAIRS: [FieldPair; 2] = [
    FieldPair::new("employee", SALARY, SALES),
    FieldPair::new("customer", PURCHASES, PHONE),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersonKind {
    Base,
    Employee { salary: f64, sales: f64 },
    Customer { purchases: f64, phone: String },
}

impl PersonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonKind::Base => "base",
            PersonKind::Employee { .. } => "employee",
            PersonKind::Customer { .. } => "customer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub kind: PersonKind,
}

impl Person {
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>, age: u32) -> Self {
        Person {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            kind: PersonKind::Base,
        }
    }

    pub fn employee(mut self, salary: f64, sales: f64) -> Self {
        self.kind = PersonKind::Employee { salary, sales };
        self
    }

    pub fn customer(mut self, purchases: f64, phone: impl Into<String>) -> Self {
        self.kind = PersonKind::Customer {
            purchases,
            phone: phone.into(),
        };
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl TypedRecord for Person {
    const FAMILY: &'static str = "person";

    fn field_pairs() -> &'static [FieldPair] {
        &PAIRS
    }

    fn build(fields: &Map<String, Value>, shape: Shape) -> Result<Self, DispatchError> {
        let person = Person::new(
            require_i64(fields, ID)?,
            require_string(fields, FIRST_NAME)?,
            require_string(fields, LAST_NAME)?,
            require_u32(fields, AGE)?,
        );

        match shape {
            Shape::Base => Ok(person),
            Shape::Variant(0) => Ok(person.employee(require_f64(fields, SALARY)?, require_f64(fields, SALES)?)),
            Shape::Variant(1) => {
                Ok(person.customer(require_f64(fields, PURCHASES)?, require_string(fields, PHONE)?))
            }
            other => Err(DispatchError::unbuildable(Self::FAMILY, other)),
        }
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(ID.name.to_string(), json!(self.id));
        fields.insert(FIRST_NAME.name.to_string(), json!(self.first_name));
        fields.insert(LAST_NAME.name.to_string(), json!(self.last_name));
        fields.insert(AGE.name.to_string(), json!(self.age));

        match &self.kind {
            PersonKind::Base => {}
            PersonKind::Employee { salary, sales } => {
                fields.insert(SALARY.name.to_string(), json!(salary));
                fields.insert(SALES.name.to_string(), json!(sales));
            }
            PersonKind::Customer { purchases, phone } => {
                fields.insert(PURCHASES.name.to_string(), json!(purchases));
                fields.insert(PHONE.name.to_string(), json!(phone));
            }
        }

        fields
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn kind(&self) -> &'static str {
        self.kind.as_str()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}, {} years", self.id, self.full_name(), self.age)?;

        match &self.kind {
            PersonKind::Base => Ok(()),
            PersonKind::Employee { salary, sales } => write!(f, " | salary {}, sales {}", salary, sales),
            PersonKind::Customer { purchases, phone } => {
                write!(f, " | purchases {}, phone {}", purchases, phone)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch_one;

    #[test]
    fn test_employee_from_fields() {
        let input = json!({
            "id": 1, "firstName": "Marcelo", "lastName": "Luque", "age": 45,
            "sales": 15000, "salary": 2000
        });

        let person: Person = dispatch_one(&input).unwrap();

        assert_eq!(
            person.kind,
            PersonKind::Employee {
                salary: 2000.0,
                sales: 15000.0
            }
        );
        assert_eq!(person.full_name(), "Marcelo Luque");
    }

    #[test]
    fn test_customer_numeric_phone() {
        let input = json!({
            "id": 666, "firstName": "Nicolas", "lastName": "Serrano", "age": 23,
            "purchases": 7000, "phone": 1813181563_i64
        });

        let person: Person = dispatch_one(&input).unwrap();

        assert_eq!(
            person.kind,
            PersonKind::Customer {
                purchases: 7000.0,
                phone: "1813181563".to_string()
            }
        );
    }

    #[test]
    fn test_base_person() {
        let input = json!({ "id": 2, "firstName": "Ana", "lastName": "Paz", "age": 33 });
        let person: Person = dispatch_one(&input).unwrap();

        assert_eq!(person.kind, PersonKind::Base);
        assert_eq!(person.kind(), "base");
    }

    #[test]
    fn test_null_salary_is_present_but_invalid() {
        let input = json!({
            "id": 3, "firstName": "Leo", "lastName": "Ruiz", "age": 40,
            "salary": null, "sales": 10
        });

        let result = dispatch_one::<Person>(&input);

        assert!(matches!(
            result,
            Err(DispatchError::InvalidField { field: "salary", .. })
        ));
    }

    #[test]
    fn test_build_refuses_shapes_without_a_variant() {
        let fields = json!({ "id": 3, "firstName": "Leo", "lastName": "Ruiz", "age": 40, "sales": 10 });
        let fields = fields.as_object().unwrap();

        let partial = Shape::Partial {
            pair: 0,
            present: "sales",
            missing: "salary",
        };
        assert!(matches!(
            Person::build(fields, partial),
            Err(DispatchError::UnbuildableShape { family: "person", .. })
        ));
        assert!(matches!(
            Person::build(fields, Shape::Variant(5)),
            Err(DispatchError::UnbuildableShape { family: "person", .. })
        ));
    }

    #[test]
    fn test_display_customer() {
        let person = Person::new(5, "Manuel", "Loza", 20).customer(50000.0, "42040077");
        assert_eq!(
            person.to_string(),
            "#5 Manuel Loza, 20 years | purchases 50000, phone 42040077"
        );
    }
}
