use serde::Deserialize;
use validator::Validate;

use crate::domain::company::{NewCompany, NewDeal, UpdateCompany};
use crate::domain::types::{AvatarUrl, CompanyId, CompanyName, DealValue};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form data for creating or editing a company.
pub struct CompanyForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Optional logo link; blank clears it.
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Form data for attaching a deal to a company.
pub struct DealForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(range(min = 0.0))]
    pub value: f64,
}

impl CompanyForm {
    fn parts(&self) -> Result<(CompanyName, Option<AvatarUrl>), FormError> {
        self.validate()?;

        let name = CompanyName::new(self.name.as_str()).map_err(|_| FormError::InvalidName)?;
        let avatar_url = match self.avatar_url.trim() {
            "" => None,
            url => Some(AvatarUrl::new(url).map_err(|_| FormError::InvalidUrl)?),
        };
        Ok((name, avatar_url))
    }

    pub fn to_new_company(&self) -> Result<NewCompany, FormError> {
        let (name, avatar_url) = self.parts()?;
        Ok(NewCompany::new(name, avatar_url))
    }

    pub fn to_update_company(&self) -> Result<UpdateCompany, FormError> {
        let (name, avatar_url) = self.parts()?;
        Ok(UpdateCompany::new(name, avatar_url))
    }
}

impl DealForm {
    pub fn to_new_deal(&self, company_id: CompanyId) -> Result<NewDeal, FormError> {
        self.validate()?;

        let value = DealValue::new(self.value).map_err(|_| FormError::InvalidAmount)?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::InvalidName);
        }
        Ok(NewDeal {
            company_id,
            title: title.to_string(),
            value,
        })
    }
}
