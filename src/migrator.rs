use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_properties_table::Migration),
            Box::new(m20250301_000002_create_invoices_table::Migration),
            Box::new(m20250301_000003_create_invoice_line_items_table::Migration),
            Box::new(m20250301_000004_create_payments_table::Migration),
            Box::new(m20250301_000005_create_financial_transactions_table::Migration),
            Box::new(m20250301_000006_create_invoice_sequences_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_properties_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_properties_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Properties::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Properties::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Properties::OwnerId).uuid().not_null())
                        .col(ColumnDef::new(Properties::Name).string().not_null())
                        .col(
                            ColumnDef::new(Properties::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-properties-owner_id")
                        .table(Properties::Table)
                        .col(Properties::OwnerId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Properties::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Properties {
        Table,
        Id,
        OwnerId,
        Name,
        CreatedAt,
    }
}

mod m20250301_000002_create_invoices_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_invoices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Invoices::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::InvoiceType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Invoices::Status).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Invoices::PaymentStatus)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Invoices::IssuedBy).uuid().not_null())
                        .col(ColumnDef::new(Invoices::IssuedTo).uuid().not_null())
                        .col(ColumnDef::new(Invoices::PropertyId).uuid().null())
                        .col(ColumnDef::new(Invoices::CustomerName).string().not_null())
                        .col(ColumnDef::new(Invoices::CustomerEmail).string().not_null())
                        .col(ColumnDef::new(Invoices::CustomerAddress).string().null())
                        .col(ColumnDef::new(Invoices::Currency).string_len(3).not_null())
                        .col(
                            ColumnDef::new(Invoices::Subtotal)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TaxRate)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TaxAmount)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::DiscountAmount)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TotalAmount)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::AmountPaid)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::AmountDue)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Invoices::IssueDate).date().not_null())
                        .col(ColumnDef::new(Invoices::DueDate).date().not_null())
                        .col(ColumnDef::new(Invoices::PaidDate).date().null())
                        .col(ColumnDef::new(Invoices::Notes).string().null())
                        .col(ColumnDef::new(Invoices::Terms).string().null())
                        .col(
                            ColumnDef::new(Invoices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Invoices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-invoices-property_id")
                                .from(Invoices::Table, Invoices::PropertyId)
                                .to(
                                    super::m20250301_000001_create_properties_table::Properties::Table,
                                    super::m20250301_000001_create_properties_table::Properties::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-invoices-issued_by")
                        .table(Invoices::Table)
                        .col(Invoices::IssuedBy)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-invoices-issued_to")
                        .table(Invoices::Table)
                        .col(Invoices::IssuedTo)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-invoices-type-status")
                        .table(Invoices::Table)
                        .col(Invoices::InvoiceType)
                        .col(Invoices::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Invoices {
        Table,
        Id,
        InvoiceNumber,
        InvoiceType,
        Status,
        PaymentStatus,
        IssuedBy,
        IssuedTo,
        PropertyId,
        CustomerName,
        CustomerEmail,
        CustomerAddress,
        Currency,
        Subtotal,
        TaxRate,
        TaxAmount,
        DiscountAmount,
        TotalAmount,
        AmountPaid,
        AmountDue,
        IssueDate,
        DueDate,
        PaidDate,
        Notes,
        Terms,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_invoice_line_items_table {
    use sea_orm_migration::prelude::*;

    use super::m20250301_000002_create_invoices_table::Invoices;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_invoice_line_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InvoiceLineItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InvoiceLineItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InvoiceLineItems::InvoiceId).uuid().not_null())
                        .col(ColumnDef::new(InvoiceLineItems::ItemType).string().not_null())
                        .col(
                            ColumnDef::new(InvoiceLineItems::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceLineItems::Quantity)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceLineItems::UnitPrice)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceLineItems::TaxRate)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InvoiceLineItems::TaxAmount)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InvoiceLineItems::DiscountAmount)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InvoiceLineItems::TotalAmount)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InvoiceLineItems::Position)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-invoice_line_items-invoice_id")
                                .from(InvoiceLineItems::Table, InvoiceLineItems::InvoiceId)
                                .to(Invoices::Table, Invoices::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-invoice_line_items-invoice_id")
                        .table(InvoiceLineItems::Table)
                        .col(InvoiceLineItems::InvoiceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InvoiceLineItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum InvoiceLineItems {
        Table,
        Id,
        InvoiceId,
        ItemType,
        Description,
        Quantity,
        UnitPrice,
        TaxRate,
        TaxAmount,
        DiscountAmount,
        TotalAmount,
        Position,
    }
}

mod m20250301_000004_create_payments_table {
    use sea_orm_migration::prelude::*;

    use super::m20250301_000002_create_invoices_table::Invoices;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_payments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Payments::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Payments::InvoiceId).uuid().not_null())
                        .col(
                            ColumnDef::new(Payments::PaymentMethod)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::Amount)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Payments::Currency).string_len(3).not_null())
                        .col(ColumnDef::new(Payments::PaymentDate).date().not_null())
                        .col(ColumnDef::new(Payments::Status).string_len(32).not_null())
                        .col(ColumnDef::new(Payments::PayerId).uuid().not_null())
                        .col(ColumnDef::new(Payments::PayerName).string().not_null())
                        .col(ColumnDef::new(Payments::PayerEmail).string().not_null())
                        .col(ColumnDef::new(Payments::GatewayReference).string().null())
                        .col(ColumnDef::new(Payments::Notes).string().null())
                        .col(ColumnDef::new(Payments::Metadata).json().null())
                        .col(
                            ColumnDef::new(Payments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-payments-invoice_id")
                                .from(Payments::Table, Payments::InvoiceId)
                                .to(Invoices::Table, Invoices::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-payments-invoice_id")
                        .table(Payments::Table)
                        .col(Payments::InvoiceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Payments {
        Table,
        Id,
        InvoiceId,
        PaymentMethod,
        Amount,
        Currency,
        PaymentDate,
        Status,
        PayerId,
        PayerName,
        PayerEmail,
        GatewayReference,
        Notes,
        Metadata,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000005_create_financial_transactions_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_financial_transactions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FinancialTransactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FinancialTransactions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::TransactionType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::Amount)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::Currency)
                                .string_len(3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::SourceType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::SourceId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::FromUserId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::ToUserId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::TransactionDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::Status)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialTransactions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-financial_transactions-source")
                        .table(FinancialTransactions::Table)
                        .col(FinancialTransactions::SourceType)
                        .col(FinancialTransactions::SourceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FinancialTransactions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum FinancialTransactions {
        Table,
        Id,
        TransactionType,
        Amount,
        Currency,
        SourceType,
        SourceId,
        FromUserId,
        ToUserId,
        Description,
        TransactionDate,
        Status,
        CreatedAt,
    }
}

mod m20250301_000006_create_invoice_sequences_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000006_create_invoice_sequences_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InvoiceSequences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InvoiceSequences::InvoiceType)
                                .string_len(32)
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceSequences::NextValue)
                                .big_integer()
                                .not_null()
                                .default(1),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InvoiceSequences::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum InvoiceSequences {
        Table,
        InvoiceType,
        NextValue,
    }
}
