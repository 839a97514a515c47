use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::NewCustomer;
use crate::domain::types::{CustomerEmail, CustomerName, CustomerSource, UserId, non_blank};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Payload for `POST /api/customers`.
pub struct AddCustomerForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl AddCustomerForm {
    /// Validates the payload and converts it into a domain insert.
    ///
    /// Unlike bulk intake, a malformed email is rejected here instead of dropped.
    pub fn into_new_customer(self, user_id: UserId) -> Result<NewCustomer, FormError> {
        self.validate()?;

        let name = CustomerName::new(self.name).map_err(|_| FormError::InvalidName)?;
        let source = match non_blank(self.source) {
            Some(source) => source.parse::<CustomerSource>()?,
            None => CustomerSource::default(),
        };
        let email = non_blank(self.email)
            .map(CustomerEmail::new)
            .transpose()?;

        let mut customer = NewCustomer::new(user_id, name, source)
            .with_phone(self.phone)
            .with_address(self.address)
            .with_notes(self.notes);
        customer.email = email;
        Ok(customer)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerListParams {
    #[serde(default)]
    pub search: Option<String>,
}

/// Parses uploaded CSV text into customers.
///
/// The first non-blank line is the header. Recognised columns are `name`,
/// `email`, `phone`, `address` and `notes`, matched case-insensitively; any
/// other column is ignored. Rows without a name are skipped.
pub fn parse_customers_csv(text: &str, user_id: &UserId) -> Result<Vec<NewCustomer>, FormError> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(FormError::TooFewRows);
    }
    let body = lines.join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let name_col = column("name");
    let email_col = column("email");
    let phone_col = column("phone");
    let address_col = column("address");
    let notes_col = column("notes");

    let mut customers = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(str::to_string)
                .filter(|v| !v.is_empty())
        };

        let Some(name) = field(name_col).and_then(|n| CustomerName::new(n).ok()) else {
            continue;
        };

        customers.push(
            NewCustomer::new(user_id.clone(), name, CustomerSource::Csv)
                .with_email(field(email_col))
                .with_phone(field(phone_col))
                .with_address(field(address_col))
                .with_notes(field(notes_col)),
        );
    }

    if customers.is_empty() {
        return Err(FormError::NoValidCustomers);
    }
    Ok(customers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[test]
    fn csv_header_is_case_insensitive_and_extra_columns_ignored() {
        let text = "\n Name ,EMAIL,Phone,Company\nAsha,asha@example.com,0712345678,Duka\n\nBaraka,,,\n";
        let customers = parse_customers_csv(text, &user()).unwrap();

        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].name.as_str(), "Asha");
        assert_eq!(customers[0].email.as_ref().unwrap().as_str(), "asha@example.com");
        assert_eq!(customers[0].phone.as_deref(), Some("0712345678"));
        assert_eq!(customers[0].source, CustomerSource::Csv);
        assert_eq!(customers[1].name.as_str(), "Baraka");
        assert!(customers[1].email.is_none());
    }

    #[test]
    fn csv_rows_without_name_are_skipped() {
        let text = "name,phone\n,0711000000\nJuma,0722000000";
        let customers = parse_customers_csv(text, &user()).unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name.as_str(), "Juma");
    }

    #[test]
    fn csv_needs_header_and_data_row() {
        assert!(matches!(
            parse_customers_csv("name,email\n   \n", &user()),
            Err(FormError::TooFewRows)
        ));
    }

    #[test]
    fn csv_without_any_named_row_is_rejected() {
        assert!(matches!(
            parse_customers_csv("email\nx@example.com", &user()),
            Err(FormError::NoValidCustomers)
        ));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let text = "name,address\n\"Mariam\",\"Plot 4, Kariakoo\"";
        let customers = parse_customers_csv(text, &user()).unwrap();
        assert_eq!(customers[0].address.as_deref(), Some("Plot 4, Kariakoo"));
    }

    #[test]
    fn manual_form_defaults_source_and_rejects_bad_email() {
        let form = AddCustomerForm {
            name: " Zawadi ".into(),
            email: Some("".into()),
            phone: None,
            address: None,
            notes: None,
            source: None,
        };
        let customer = form.into_new_customer(user()).unwrap();
        assert_eq!(customer.name.as_str(), "Zawadi");
        assert_eq!(customer.source, CustomerSource::Manual);
        assert!(customer.email.is_none());

        let form = AddCustomerForm {
            name: "Zawadi".into(),
            email: Some("not-an-email".into()),
            phone: None,
            address: None,
            notes: None,
            source: None,
        };
        assert!(matches!(
            form.into_new_customer(user()),
            Err(FormError::InvalidEmail)
        ));
    }

    #[test]
    fn manual_form_rejects_blank_name() {
        let form = AddCustomerForm {
            name: "   ".into(),
            email: None,
            phone: None,
            address: None,
            notes: None,
            source: Some("voice".into()),
        };
        assert!(matches!(
            form.into_new_customer(user()),
            Err(FormError::InvalidName)
        ));
    }
}
