use clap::ValueEnum;

/// Display language for ledger labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    En,
    Tr,
}

/// How a ledger column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Year,
    Money,
    Rate,
}

/// Ledger columns in display order: (result field, kind).
pub const LEDGER_COLUMNS: [(&str, ColumnKind); 10] = [
    ("year", ColumnKind::Year),
    ("property_value", ColumnKind::Money),
    ("appreciation_rate", ColumnKind::Rate),
    ("appreciation_amount", ColumnKind::Money),
    ("rental_income", ColumnKind::Money),
    ("management_fee", ColumnKind::Money),
    ("maintenance_expense", ColumnKind::Money),
    ("instalment_payment", ColumnKind::Money),
    ("net_profit", ColumnKind::Money),
    ("remaining_debt", ColumnKind::Money),
];

pub struct Labels {
    pub year: &'static str,
    pub property_value: &'static str,
    pub appreciation_rate: &'static str,
    pub appreciation_amount: &'static str,
    pub rental_income: &'static str,
    pub management_fee: &'static str,
    pub maintenance_expense: &'static str,
    pub instalment_payment: &'static str,
    pub net_profit: &'static str,
    pub remaining_debt: &'static str,
    pub total: &'static str,
    pub global_roi: &'static str,
    pub global_profit: &'static str,
    pub warnings: &'static str,
}

const EN: Labels = Labels {
    year: "Year",
    property_value: "Property Value",
    appreciation_rate: "Appreciation Rate (%)",
    appreciation_amount: "Appreciation Amount",
    rental_income: "Rental Income",
    management_fee: "Management Fees",
    maintenance_expense: "Maintenance Fees",
    instalment_payment: "Instalment Payments",
    net_profit: "Net Profit",
    remaining_debt: "Remaining Debt",
    total: "Total",
    global_roi: "Global ROI",
    global_profit: "Global Profit",
    warnings: "Warnings",
};

const TR: Labels = Labels {
    year: "Yıl",
    property_value: "Mülk Değeri",
    appreciation_rate: "Değer Artış Oranı (%)",
    appreciation_amount: "Değer Artış Miktarı",
    rental_income: "Kira Geliri",
    management_fee: "Yönetim Ücreti",
    maintenance_expense: "Bakım Ücreti",
    instalment_payment: "Taksit Ödemeleri",
    net_profit: "Net Kar",
    remaining_debt: "Kalan Borç",
    total: "Toplam",
    global_roi: "Toplam Yatırım Getirisi",
    global_profit: "Toplam Kar",
    warnings: "Uyarılar",
};

impl Language {
    pub fn labels(self) -> &'static Labels {
        match self {
            Language::En => &EN,
            Language::Tr => &TR,
        }
    }
}

impl Labels {
    /// Header for a ledger field; unknown fields fall back to the field name.
    pub fn column<'a>(&self, key: &'a str) -> &'a str {
        match key {
            "year" => self.year,
            "property_value" => self.property_value,
            "appreciation_rate" => self.appreciation_rate,
            "appreciation_amount" => self.appreciation_amount,
            "rental_income" => self.rental_income,
            "management_fee" => self.management_fee,
            "maintenance_expense" => self.maintenance_expense,
            "instalment_payment" => self.instalment_payment,
            "net_profit" => self.net_profit,
            "remaining_debt" => self.remaining_debt,
            other => other,
        }
    }
}
